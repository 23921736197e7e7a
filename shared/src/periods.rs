//! Reporting period arithmetic
//!
//! Sales history and summary reports work over day, week, and month
//! windows. Weeks start on Monday. All bounds are half-open UTC
//! intervals so a record can never land in two adjacent periods.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::types::PeriodMode;

/// Half-open period interval: `start <= t < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve the period containing `target` for the given granularity.
pub fn period_bounds(mode: PeriodMode, target: NaiveDate) -> PeriodBounds {
    let (first, last_exclusive) = match mode {
        PeriodMode::Day => (target, target + Duration::days(1)),
        PeriodMode::Week => {
            let monday = target - Duration::days(target.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(7))
        }
        PeriodMode::Month => {
            let first = target.with_day(1).unwrap_or(target);
            let next = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .unwrap_or(first + Duration::days(31));
            (first, next)
        }
    };

    PeriodBounds {
        start: start_of_day(first),
        end: start_of_day(last_exclusive),
    }
}

/// Lower bound for the invoice list/export lookback filter.
/// Accepts "today", "week" (last 7 days), "month" (last 30 days, the
/// default) and "all" (no bound).
pub fn lookback_start(range: Option<&str>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let range = range.unwrap_or("month").trim().to_ascii_lowercase();
    let today = now.date_naive();

    match range.as_str() {
        "today" => Some(start_of_day(today)),
        "week" => Some(start_of_day(today - Duration::days(7))),
        "all" => None,
        // "month" and anything unrecognized
        _ => Some(start_of_day(today - Duration::days(30))),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    // Midnight exists for every calendar date
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}
