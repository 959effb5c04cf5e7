use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use strum::IntoStaticStr;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AppError {
    /// Entity absent; carries the entity name ("Leave", "User").
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Invalid leave range")]
    InvalidRange,

    /// The first touched year whose balance would drop below zero.
    #[display(fmt = "Not enough leave days")]
    InsufficientBalance {
        year: i32,
        remaining: i64,
        requested: i64,
    },

    #[display(fmt = "{}", _0)]
    MalformedPayload(String),

    #[display(fmt = "{} already exists", _0)]
    AlreadyExists(&'static str),

    /// A leave refers to a user that does not exist.
    #[display(fmt = "User not found")]
    UnknownUser(u64),

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRange
            | AppError::InsufficientBalance { .. }
            | AppError::MalformedPayload(_)
            | AppError::AlreadyExists(_)
            | AppError::UnknownUser(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Database(e) = self {
            error!(error = %e, "Database operation failed");
        }

        let code: &'static str = self.into();
        let mut body = json!({
            "message": self.to_string(),
            "code": code,
        });

        if let AppError::InsufficientBalance {
            year,
            remaining,
            requested,
        } = self
        {
            body["year"] = json!(year);
            body["remaining"] = json!(remaining);
            body["requested"] = json!(requested);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::NotFound("Leave").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InsufficientBalance {
                year: 2021,
                remaining: 53,
                requested: 334
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MalformedPayload("Missing leave data".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AlreadyExists("User").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UnknownUser(3).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_and_codes() {
        assert_eq!(AppError::NotFound("Leave").to_string(), "Leave not found");
        assert_eq!(AppError::AlreadyExists("User").to_string(), "User already exists");
        assert_eq!(AppError::InvalidRange.to_string(), "Invalid leave range");

        let code: &'static str = (&AppError::InvalidRange).into();
        assert_eq!(code, "INVALID_RANGE");
        let code: &'static str = (&AppError::InsufficientBalance {
            year: 2021,
            remaining: 0,
            requested: 1,
        })
            .into();
        assert_eq!(code, "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn database_errors_hide_details() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
