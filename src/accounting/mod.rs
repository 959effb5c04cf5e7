//! Leave-day accounting against the annual quota.

pub mod balance;
pub mod validate;

use chrono::Datelike;

use crate::{
    error::{AppError, AppResult},
    store::Store,
};
use balance::{remaining_days, touched_years, year_window};
use validate::{LeaveCandidate, check_range};

/// Remaining days of `user_id` in `year`, read from the store.
pub async fn remaining_for(store: &dyn Store, user_id: u64, year: i32, quota: i64) -> AppResult<i64> {
    let Some((from, until)) = year_window(year, year) else {
        return Err(AppError::MalformedPayload(format!("Year {year} out of range")));
    };

    let leaves = store.user_leaves_between(user_id, from, until).await?;
    Ok(remaining_days(quota, &leaves, user_id, year))
}

/// Loads the user's leaves for every year `candidate` touches and validates
/// against them.
pub async fn check_candidate(store: &dyn Store, candidate: &LeaveCandidate, quota: i64) -> AppResult<()> {
    check_range(candidate.start_date, candidate.end_date)?;

    let years = touched_years(candidate.start_date.date(), candidate.end_date.date());
    let Some((from, until)) = year_window(*years.start(), *years.end()) else {
        return Err(AppError::MalformedPayload(format!(
            "Leave year {} out of range",
            candidate.end_date.year()
        )));
    };

    let existing = store
        .user_leaves_between(candidate.user_id, from, until)
        .await?;

    validate::validate(candidate, &existing, quota)
}
