//! Bucket series generation for chart axes
//!
//! Walks backward from the window containing `now`, producing contiguous,
//! non-overlapping buckets of one unit each, oldest first. Buckets are
//! recomputed on every request; nothing here is persisted.

use chrono::{Datelike, Duration, Months, NaiveDateTime};

use super::period::{self, PeriodUnit, TimeRange};

/// One fixed-width chart window with its display label
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub range: TimeRange,
    pub label: String,
    pub unit: PeriodUnit,
}

/// Generate `count` consecutive buckets ending with the window that contains
/// `now`. Returned oldest first; the last bucket equals
/// `resolve(unit, now).current`.
pub fn generate(unit: PeriodUnit, count: u32, now: NaiveDateTime) -> Vec<Bucket> {
    let current = period::resolve(unit, now).current;

    (0..count)
        .rev()
        .map(|offset| {
            let range = window_at(unit, current.start, offset);
            Bucket {
                label: label_for(unit, range.start),
                range,
                unit,
            }
        })
        .collect()
}

/// The window `offset` units before the one starting at `current_start`
fn window_at(unit: PeriodUnit, current_start: NaiveDateTime, offset: u32) -> TimeRange {
    match unit {
        PeriodUnit::Hour => {
            let start = current_start - Duration::hours(offset as i64);
            TimeRange::new(start, start + Duration::hours(1))
        }
        PeriodUnit::Day => {
            let start = current_start - Duration::days(offset as i64);
            TimeRange::new(start, start + Duration::days(1))
        }
        PeriodUnit::Week => {
            let start = current_start - Duration::days(7 * offset as i64);
            TimeRange::new(start, start + Duration::days(7))
        }
        PeriodUnit::Month => {
            // current_start is always the first of a month, so month stepping
            // never lands on an invalid day
            let start_date = current_start.date() - Months::new(offset);
            let start = period::midnight(start_date);
            TimeRange::new(start, period::midnight(start_date + Months::new(1)))
        }
    }
}

/// Human-readable label for a bucket starting at `start`
fn label_for(unit: PeriodUnit, start: NaiveDateTime) -> String {
    match unit {
        PeriodUnit::Hour => start.format("%H:%M").to_string(),
        PeriodUnit::Day => start.format("%d/%m").to_string(),
        PeriodUnit::Week => {
            format!("Tuần {}/{}", week_of_month(start.day()), start.month())
        }
        PeriodUnit::Month => start.format("%b %Y").to_string(),
    }
}

/// Week-of-month ordinal: `ceil(day_of_month / 7)`
fn week_of_month(day_of_month: u32) -> u32 {
    day_of_month.div_ceil(7)
}
