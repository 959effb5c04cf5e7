use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;

use super::parse_date;
use crate::{
    accounting::{self, validate::LeaveCandidate, validate::check_range},
    config::Config,
    error::{AppError, AppResult},
    model::leave::NewLeave,
    store::Store,
    utils::user_lock::UserLocks,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 1)]
    pub user_id: Option<u64>,
    #[schema(example = "2021-12-20T00:00:00", format = "date-time", value_type = String)]
    pub start_date: Option<String>,
    #[schema(example = "2022-01-10T00:00:00", format = "date-time", value_type = String)]
    pub end_date: Option<String>,
}

/// Fields left out keep their stored value.
#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[schema(example = "2021-12-22T00:00:00", format = "date-time", value_type = String)]
    pub start_date: Option<String>,
    #[schema(example = "2022-01-10T00:00:00", format = "date-time", value_type = String)]
    pub end_date: Option<String>,
}

/// Get a leave entry
#[utoipa::path(
    get,
    path = "/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave")
    ),
    responses(
        (status = 200, description = "Leave found", body = LeaveRecord),
        (status = 404, description = "Leave not found", body = Object, example = json!({
            "message": "Leave not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(store: web::Data<dyn Store>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let leave_id = path.into_inner();

    let leave = store
        .get_leave(leave_id)
        .await?
        .ok_or(AppError::NotFound("Leave"))?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Update the dates of a leave entry
#[utoipa::path(
    put,
    path = "/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave updated", body = LeaveRecord),
        (status = 400, description = "Invalid range or not enough leave days", body = Object, example = json!({
            "message": "Not enough leave days",
            "code": "INSUFFICIENT_BALANCE",
            "year": 2021,
            "remaining": 53,
            "requested": 334
        })),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    locks: web::Data<UserLocks>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> AppResult<HttpResponse> {
    let leave_id = path.into_inner();
    let changes = payload.into_inner();

    let start = changes
        .start_date
        .as_deref()
        .map(|value| parse_date("start_date", value))
        .transpose()?;
    let end = changes
        .end_date
        .as_deref()
        .map(|value| parse_date("end_date", value))
        .transpose()?;

    let owner = store
        .get_leave(leave_id)
        .await?
        .ok_or(AppError::NotFound("Leave"))?
        .user_id;

    // merge against the record as it is once the lock is held
    let _guard = locks.acquire(owner).await;
    let mut leave = store
        .get_leave(leave_id)
        .await?
        .ok_or(AppError::NotFound("Leave"))?;

    if let Some(start) = start {
        leave.start_date = start;
    }
    if let Some(end) = end {
        leave.end_date = end;
    }
    check_range(leave.start_date, leave.end_date)?;

    accounting::check_candidate(
        store.get_ref(),
        &LeaveCandidate::from(&leave),
        config.annual_quota,
    )
    .await?;

    if !store.update_leave(&leave).await? {
        return Err(AppError::NotFound("Leave"));
    }

    info!(leave_id, user_id = leave.user_id, "Leave updated");
    Ok(HttpResponse::Ok().json(leave))
}

/// Delete a leave entry
#[utoipa::path(
    delete,
    path = "/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave")
    ),
    responses(
        (status = 200, description = "Leave deleted", body = Object, example = json!({
            "message": "Leave deleted"
        })),
        (status = 404, description = "Leave not found")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(store: web::Data<dyn Store>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let leave_id = path.into_inner();

    if !store.delete_leave(leave_id).await? {
        return Err(AppError::NotFound("Leave"));
    }

    info!(leave_id, "Leave deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave deleted"
    })))
}

/// Create a leave entry
#[utoipa::path(
    post,
    path = "/leave/create",
    request_body(
        content = CreateLeave,
        description = "Leave payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave created", body = LeaveRecord),
        (status = 400, description = "Missing data, invalid range, unknown user or not enough leave days", body = Object, example = json!({
            "message": "Missing leave data",
            "code": "MALFORMED_PAYLOAD"
        }))
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    locks: web::Data<UserLocks>,
    payload: web::Json<CreateLeave>,
) -> AppResult<HttpResponse> {
    let CreateLeave {
        user_id: Some(user_id),
        start_date: Some(start),
        end_date: Some(end),
    } = payload.into_inner()
    else {
        return Err(AppError::MalformedPayload("Missing leave data".to_string()));
    };

    let leave = NewLeave {
        user_id,
        start_date: parse_date("start_date", &start)?,
        end_date: parse_date("end_date", &end)?,
    };
    check_range(leave.start_date, leave.end_date)?;

    let _guard = locks.acquire(user_id).await;
    if store.get_user(user_id).await?.is_none() {
        return Err(AppError::UnknownUser(user_id));
    }

    accounting::check_candidate(
        store.get_ref(),
        &LeaveCandidate::from(&leave),
        config.annual_quota,
    )
    .await?;

    let record = store.insert_leave(&leave).await?;

    info!(leave_id = record.id, user_id, "Leave created");
    Ok(HttpResponse::Created().json(record))
}

/// Remaining leave days of a user in a calendar year
#[utoipa::path(
    get,
    path = "/leave/remaining/{user_id}/{year}",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        ("year" = i32, Path, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "Remaining days", body = Object, example = json!({
            "remaining": 53
        }))
    ),
    tag = "Leave"
)]
pub async fn remaining_leave(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    path: web::Path<(u64, i32)>,
) -> AppResult<HttpResponse> {
    let (user_id, year) = path.into_inner();

    let remaining =
        accounting::remaining_for(store.get_ref(), user_id, year, config.annual_quota).await?;

    Ok(HttpResponse::Ok().json(json!({
        "remaining": remaining
    })))
}

/// Leave of a user scheduled from a date onwards.
///
/// A leave that started before the date but has not ended yet is included.
#[utoipa::path(
    get,
    path = "/leave/scheduled/{user_id}/{date_from}",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        ("date_from" = String, Path, description = "Date as YYYY-MM-DDTHH:MM:SS")
    ),
    responses(
        (status = 200, description = "Scheduled leave ordered by start date", body = Vec<LeaveRecord>),
        (status = 400, description = "Malformed date")
    ),
    tag = "Leave"
)]
pub async fn scheduled_leave(
    store: web::Data<dyn Store>,
    path: web::Path<(u64, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, date_from) = path.into_inner();
    let from = parse_date("date", &date_from)?;

    let leaves = store.user_leaves_from(user_id, from.date()).await?;
    debug!(user_id, %from, count = leaves.len(), "Scheduled leave fetched");

    Ok(HttpResponse::Ok().json(leaves))
}

/// List all leave entries
#[utoipa::path(
    get,
    path = "/leave/list",
    responses(
        (status = 200, description = "All leave entries", body = Vec<LeaveRecord>)
    ),
    tag = "Leave"
)]
pub async fn leave_list(store: web::Data<dyn Store>) -> AppResult<HttpResponse> {
    let leaves = store.list_leaves().await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/// Delete all leave entries
#[utoipa::path(
    delete,
    path = "/leave/list",
    responses(
        (status = 200, description = "Number of deleted entries", body = Object, example = json!({
            "message": "3 leave(s) deleted"
        }))
    ),
    tag = "Leave"
)]
pub async fn delete_leave_list(store: web::Data<dyn Store>) -> AppResult<HttpResponse> {
    let deleted = store.delete_all_leaves().await?;

    info!(deleted, "All leaves deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{deleted} leave(s) deleted")
    })))
}
