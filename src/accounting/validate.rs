use chrono::NaiveDateTime;

use super::balance::{days_in_year, remaining_days, touched_years};
use crate::{
    error::{AppError, AppResult},
    model::leave::{LeaveRecord, NewLeave},
};

/// A leave about to be created (`id == None`) or rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveCandidate {
    pub id: Option<u64>,
    pub user_id: u64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl From<&NewLeave> for LeaveCandidate {
    fn from(leave: &NewLeave) -> Self {
        Self {
            id: None,
            user_id: leave.user_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
        }
    }
}

impl From<&LeaveRecord> for LeaveCandidate {
    fn from(leave: &LeaveRecord) -> Self {
        Self {
            id: Some(leave.id),
            user_id: leave.user_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
        }
    }
}

pub fn check_range(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if start > end {
        return Err(AppError::InvalidRange);
    }
    Ok(())
}

/// Checks `candidate` against the quota of every year it touches.
///
/// `existing` may contain the candidate itself and records of other users;
/// both are left out of the balance.
pub fn validate(candidate: &LeaveCandidate, existing: &[LeaveRecord], quota: i64) -> AppResult<()> {
    check_range(candidate.start_date, candidate.end_date)?;

    let start = candidate.start_date.date();
    let end = candidate.end_date.date();
    let own_id = candidate.id;
    let others = || existing.iter().filter(move |r| own_id != Some(r.id));

    for year in touched_years(start, end) {
        let remaining = remaining_days(quota, others(), candidate.user_id, year);
        let requested = days_in_year(start, end, year);
        if remaining - requested < 0 {
            return Err(AppError::InsufficientBalance {
                year,
                remaining,
                requested,
            });
        }
    }

    Ok(())
}
