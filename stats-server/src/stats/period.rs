//! Period resolution: current/previous window pairs
//!
//! All windows are half-open `[start, end)` in business-local time. The
//! resolver is deterministic for a given `(unit, now)` and never touches the
//! caller's clock: every anchor (hour, midnight, Monday, first-of-month) is
//! computed into a fresh value.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

use super::StatsError;
use crate::utils::time::local_datetime_to_millis;

/// Granularity of time bucketing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl PeriodUnit {
    /// Every recognized unit
    pub const ALL: [PeriodUnit; 4] = [
        PeriodUnit::Hour,
        PeriodUnit::Day,
        PeriodUnit::Week,
        PeriodUnit::Month,
    ];

    /// Units the revenue line chart accepts
    pub const CHART: [PeriodUnit; 3] = [PeriodUnit::Day, PeriodUnit::Week, PeriodUnit::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodUnit::Hour => "hour",
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
        }
    }

    /// Parse a query-string period value, accepting any recognized unit
    pub fn parse(value: &str) -> Result<Self, StatsError> {
        Self::parse_allowed(value, &Self::ALL)
    }

    /// Parse a query-string period value restricted to `allowed`.
    ///
    /// Fails before any storage access is attempted; the error message
    /// enumerates the set the operation supports.
    pub fn parse_allowed(value: &str, allowed: &[PeriodUnit]) -> Result<Self, StatsError> {
        let unit = match value {
            "hour" => PeriodUnit::Hour,
            "day" => PeriodUnit::Day,
            "week" => PeriodUnit::Week,
            "month" => PeriodUnit::Month,
            _ => return Err(Self::invalid(value, allowed)),
        };
        if allowed.contains(&unit) {
            Ok(unit)
        } else {
            Err(Self::invalid(value, allowed))
        }
    }

    fn invalid(value: &str, allowed: &[PeriodUnit]) -> StatsError {
        StatsError::InvalidPeriodUnit {
            got: value.to_string(),
            allowed: allowed
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open interval `[start, end)` in business-local time.
///
/// Invariant: `start < end` and the width is exactly one period unit
/// (calendar months keep their natural variable length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Convert to Unix millis for the repository layer
    pub fn to_millis(&self, tz: Tz) -> (i64, i64) {
        (
            local_datetime_to_millis(self.start, tz),
            local_datetime_to_millis(self.end, tz),
        )
    }
}

/// The window containing `now` plus the equal-width window before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub current: TimeRange,
    pub previous: TimeRange,
}

/// Resolve the current and previous windows for `unit` around `now`.
///
/// The two windows are contiguous: `previous.end == current.start`.
pub fn resolve(unit: PeriodUnit, now: NaiveDateTime) -> PeriodRange {
    match unit {
        PeriodUnit::Hour => {
            let start = hour_start(now);
            fixed_width(start, Duration::hours(1))
        }
        PeriodUnit::Day => {
            let start = midnight(now.date());
            fixed_width(start, Duration::days(1))
        }
        PeriodUnit::Week => {
            let start = midnight(monday_of_week(now.date()));
            fixed_width(start, Duration::days(7))
        }
        PeriodUnit::Month => {
            let current_start = midnight(month_start(now.date()));
            let current_end = midnight(month_start(now.date()) + Months::new(1));
            let previous_start = midnight(month_start(now.date()) - Months::new(1));
            PeriodRange {
                current: TimeRange::new(current_start, current_end),
                previous: TimeRange::new(previous_start, current_start),
            }
        }
    }
}

fn fixed_width(current_start: NaiveDateTime, width: Duration) -> PeriodRange {
    PeriodRange {
        current: TimeRange::new(current_start, current_start + width),
        previous: TimeRange::new(current_start - width, current_start),
    }
}

/// Truncate to the start of the hour containing `now`
pub(crate) fn hour_start(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_time(NaiveTime::from_hms_opt(now.hour(), 0, 0).unwrap_or(NaiveTime::MIN))
}

pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Monday of the ISO week containing `date` (weeks start on Monday)
pub(crate) fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the calendar month containing `date`
pub(crate) fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
