//! Current-vs-previous period comparison

use serde::Serialize;

use super::round2;

/// Sign of the change between two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Comparison of one measure across two equal-width periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeResult {
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
    pub trend: Trend,
}

/// Compare a current-period value against the previous period.
///
/// `change_percent = (current - previous) / previous * 100`, rounded to two
/// decimals. When `previous` is zero no division happens: the change is 100
/// for any growth and 0 otherwise. Trend is up whenever the change is
/// non-negative.
pub fn compare(current: f64, previous: f64) -> ComparativeResult {
    let change_percent = if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        round2((current - previous) / previous * 100.0)
    };

    ComparativeResult {
        current,
        previous,
        change_percent,
        trend: if change_percent >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        },
    }
}
