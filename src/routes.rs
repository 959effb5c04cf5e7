use crate::{
    api::{leave, user},
    config::Config,
    error::AppError,
};
use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};
use tracing::warn;

/// Per-peer-IP limiter allowing `requests_per_min`, refilled evenly.
pub fn build_limiter(requests_per_min: u32) -> Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit: {requests_per_min} requests per minute"))
}

fn leave_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(error = %err, path = %req.path(), "Rejected leave payload");
        AppError::MalformedPayload("No leave data provided".to_string()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/leave")
                    .app_data(leave_json_config())
                    // /leave/list
                    .service(
                        web::resource("/list")
                            .route(web::get().to(leave::leave_list))
                            .route(web::delete().to(leave::delete_leave_list)),
                    )
                    // /leave/create
                    .service(web::resource("/create").route(web::post().to(leave::create_leave)))
                    // /leave/remaining/{user_id}/{year}
                    .service(
                        web::resource("/remaining/{user_id}/{year}")
                            .route(web::get().to(leave::remaining_leave)),
                    )
                    // /leave/scheduled/{user_id}/{date_from}
                    .service(
                        web::resource("/scheduled/{user_id}/{date_from}")
                            .route(web::get().to(leave::scheduled_leave)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave::get_leave))
                            .route(web::put().to(leave::update_leave))
                            .route(web::delete().to(leave::delete_leave)),
                    ),
            )
            .service(
                web::scope("/user")
                    // /user/list
                    .service(
                        web::resource("/list")
                            .route(web::get().to(user::user_list))
                            .route(web::delete().to(user::delete_user_list)),
                    )
                    // /user/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(user::get_user))
                            .route(web::put().to(user::add_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            ),
    );
}
