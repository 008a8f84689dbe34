//! Revenue ranking and percentage-share distribution

use std::cmp::Ordering;

use serde::Serialize;

use super::{GroupedAggregate, round2};

/// One row of a ranking result: a grouped aggregate plus its share of the
/// period total.
///
/// Percentages are rounded per row and are NOT renormalized to sum to 100;
/// the small drift this leaves in a pie chart is accepted, observable
/// behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedGroup {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sum: f64,
    pub count: i64,
    pub quantity: i64,
    pub percentage: f64,
}

/// Rank grouped aggregates by revenue, descending.
///
/// The sort is stable: rows with equal sums keep the order the storage layer
/// returned them in. Each row's percentage is its independent share of
/// `total_sum` (0 when the total is zero; never a division error).
/// Truncation to a top-N, when a caller wants one, happens after ranking.
pub fn rank(mut groups: Vec<GroupedAggregate>, total_sum: f64) -> Vec<RankedGroup> {
    groups.sort_by(|a, b| b.sum.partial_cmp(&a.sum).unwrap_or(Ordering::Equal));

    groups
        .into_iter()
        .map(|g| {
            let percentage = if total_sum > 0.0 {
                round2(g.sum / total_sum * 100.0)
            } else {
                0.0
            };
            RankedGroup {
                key: g.key,
                name: g.name,
                sum: g.sum,
                count: g.count,
                quantity: g.quantity,
                percentage,
            }
        })
        .collect()
}
