use chrono::NaiveDateTime;

use crate::{
    error::{AppError, AppResult},
    model::datetime,
};

pub mod leave;
pub mod user;

pub(crate) fn parse_date(field: &str, value: &str) -> AppResult<NaiveDateTime> {
    datetime::parse(value).map_err(|_| {
        AppError::MalformedPayload(format!(
            "Invalid {field} {value:?}, expected YYYY-MM-DDTHH:MM:SS"
        ))
    })
}
