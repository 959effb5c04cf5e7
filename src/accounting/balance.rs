//! Yearly leave-day accounting.
//!
//! All counting is done on calendar dates with both endpoints included. A
//! leave that crosses New Year is split at the boundary and each part is
//! charged to its own year.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::model::leave::LeaveRecord;

/// 12 weeks.
pub const DEFAULT_ANNUAL_QUOTA: i64 = 84;

/// Inclusive number of days between `start` and `end`.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub fn touched_years(start: NaiveDate, end: NaiveDate) -> RangeInclusive<i32> {
    start.year()..=end.year()
}

/// Jan 1 of `first` and Jan 1 of the year after `last`.
///
/// Stores select a year window as `end >= lower AND start < upper`.
pub fn year_window(first: i32, last: i32) -> Option<(NaiveDate, NaiveDate)> {
    let lower = NaiveDate::from_ymd_opt(first, 1, 1)?;
    let upper = NaiveDate::from_ymd_opt(last.checked_add(1)?, 1, 1)?;
    Some((lower, upper))
}

/// Days of `[start, end]` that fall inside `year`.
pub fn days_in_year(start: NaiveDate, end: NaiveDate, year: i32) -> i64 {
    if start.year() > year || end.year() < year {
        return 0;
    }

    let (Some(jan_first), Some(dec_last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0;
    };

    let from = start.max(jan_first);
    let to = end.min(dec_last);
    if from > to {
        return 0;
    }

    span_days(from, to)
}

/// Days charged to `user_id` in `year` by `records`. Records of other users
/// are ignored.
pub fn days_used<'a, I>(records: I, user_id: u64, year: i32) -> i64
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    records
        .into_iter()
        .filter(|r| r.user_id == user_id)
        .map(|r| days_in_year(r.start_day(), r.end_day(), year))
        .sum()
}

pub fn remaining_days<'a, I>(quota: i64, records: I, user_id: u64, year: i32) -> i64
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    let used = days_used(records, user_id, year);
    debug!(user_id, year, used, quota, "Leave balance computed");
    quota - used
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_midnight(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(0, 0, 0).unwrap()
    }

    fn leave(id: u64, user_id: u64, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        LeaveRecord {
            id,
            user_id,
            start_date: at_midnight(start),
            end_date: at_midnight(end),
        }
    }

    #[test]
    fn single_day_counts_as_one() {
        assert_eq!(span_days(day(2021, 3, 1), day(2021, 3, 1)), 1);
        assert_eq!(days_in_year(day(2021, 3, 1), day(2021, 3, 1), 2021), 1);
    }

    #[test]
    fn straddling_leave_is_split_at_new_year() {
        let (start, end) = (day(2021, 12, 20), day(2022, 1, 10));
        assert_eq!(days_in_year(start, end, 2021), 12);
        assert_eq!(days_in_year(start, end, 2022), 10);
        assert_eq!(touched_years(start, end), 2021..=2022);
    }

    #[test]
    fn leave_outside_year_contributes_nothing() {
        assert_eq!(days_in_year(day(2020, 5, 1), day(2020, 5, 10), 2021), 0);
        assert_eq!(days_in_year(day(2022, 1, 1), day(2022, 1, 10), 2021), 0);
    }

    #[test]
    fn per_year_contributions_add_up_to_span() {
        let spans = [
            (day(2021, 1, 1), day(2021, 1, 31)),
            (day(2021, 12, 31), day(2022, 1, 1)),
            (day(2019, 11, 15), day(2022, 2, 3)),
            (day(2020, 2, 28), day(2020, 3, 1)),
        ];
        for (start, end) in spans {
            let split: i64 = touched_years(start, end)
                .map(|y| days_in_year(start, end, y))
                .sum();
            assert_eq!(split, span_days(start, end), "{start}..{end}");
        }
    }

    #[test]
    fn leap_year_has_366_days() {
        assert_eq!(days_in_year(day(2019, 6, 1), day(2021, 6, 1), 2020), 366);
        assert_eq!(days_in_year(day(2019, 6, 1), day(2021, 6, 1), 2021), 152);
    }

    #[test]
    fn remaining_only_counts_the_user() {
        let records = vec![
            leave(1, 1, day(2021, 1, 1), day(2021, 1, 31)),
            leave(2, 2, day(2021, 3, 1), day(2021, 3, 10)),
            leave(3, 1, day(2020, 12, 30), day(2021, 1, 2)),
        ];
        // 31 + 2 days of the straddling leave
        assert_eq!(remaining_days(DEFAULT_ANNUAL_QUOTA, &records, 1, 2021), 84 - 33);
        assert_eq!(remaining_days(DEFAULT_ANNUAL_QUOTA, &records, 1, 2020), 84 - 2);
        assert_eq!(remaining_days(DEFAULT_ANNUAL_QUOTA, &records, 2, 2021), 74);
        assert_eq!(remaining_days(DEFAULT_ANNUAL_QUOTA, &records, 3, 2021), 84);
    }

    #[test]
    fn year_window_bounds() {
        assert_eq!(year_window(2021, 2021), Some((day(2021, 1, 1), day(2022, 1, 1))));
        assert_eq!(year_window(2020, 2022), Some((day(2020, 1, 1), day(2023, 1, 1))));
        assert_eq!(year_window(2021, i32::MAX), None);
    }

    #[test]
    fn time_of_day_is_ignored() {
        let mut record = leave(1, 1, day(2021, 1, 1), day(2021, 1, 2));
        record.start_date = day(2021, 1, 1).and_hms_opt(23, 59, 59).unwrap();
        record.end_date = day(2021, 1, 2).and_hms_opt(0, 0, 1).unwrap();
        assert_eq!(days_used([&record], 1, 2021), 2);
    }
}
