use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    model::user::User,
    store::Store,
    utils::user_lock::UserLocks,
};

/// Register a user under the given id
#[utoipa::path(
    put,
    path = "/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "User already exists", body = Object, example = json!({
            "message": "User already exists"
        }))
    ),
    tag = "User"
)]
pub async fn add_user(store: web::Data<dyn Store>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    if !store.insert_user(user_id).await? {
        return Err(AppError::AlreadyExists("User"));
    }

    info!(user_id, "User created");
    Ok(HttpResponse::Created().json(User { id: user_id }))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "User"
)]
pub async fn get_user(store: web::Data<dyn Store>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let user = store
        .get_user(path.into_inner())
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user together with their leave
#[utoipa::path(
    delete,
    path = "/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = Object, example = json!({
            "message": "User deleted"
        })),
        (status = 404, description = "User not found")
    ),
    tag = "User"
)]
pub async fn delete_user(
    store: web::Data<dyn Store>,
    locks: web::Data<UserLocks>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    let _guard = locks.acquire(user_id).await;
    if !store.delete_user(user_id).await? {
        return Err(AppError::NotFound("User"));
    }

    info!(user_id, "User deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "User deleted"
    })))
}

#[utoipa::path(
    get,
    path = "/user/list",
    responses(
        (status = 200, description = "All users", body = Vec<User>)
    ),
    tag = "User"
)]
pub async fn user_list(store: web::Data<dyn Store>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_users().await?))
}

#[utoipa::path(
    delete,
    path = "/user/list",
    responses(
        (status = 200, description = "Number of deleted users", body = Object, example = json!({
            "message": "1 user(s) deleted"
        }))
    ),
    tag = "User"
)]
pub async fn delete_user_list(store: web::Data<dyn Store>) -> AppResult<HttpResponse> {
    let deleted = store.delete_all_users().await?;

    info!(deleted, "All users deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{deleted} user(s) deleted")
    })))
}
