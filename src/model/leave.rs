use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "user_id": 1,
    "start_date": "2021-12-20T00:00:00",
    "end_date": "2022-01-10T00:00:00"
}))]
pub struct LeaveRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub user_id: u64,
    #[serde(with = "crate::model::datetime")]
    #[schema(example = "2021-12-20T00:00:00", format = "date-time", value_type = String)]
    pub start_date: NaiveDateTime,
    #[serde(with = "crate::model::datetime")]
    #[schema(example = "2022-01-10T00:00:00", format = "date-time", value_type = String)]
    pub end_date: NaiveDateTime,
}

impl LeaveRecord {
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date()
    }
}

/// A leave that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeave {
    pub user_id: u64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}
