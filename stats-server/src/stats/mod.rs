//! Dashboard statistics engine
//!
//! Pure, per-request analytics over time-bucketed aggregates:
//!
//! - [`period`] - current/previous period resolution for hour/day/week/month
//! - [`buckets`] - walking bucket series for chart axes
//! - [`compare`] - current-vs-previous percentage change
//! - [`ranking`] - revenue ranking and percentage-share distribution
//! - [`service`] - facade orchestrating the four dashboard queries
//!
//! Every component is a pure function of its explicit inputs (`now`, the
//! period unit and counts, plus aggregates fetched through [`AggregateStore`]);
//! nothing here holds state between requests.

pub mod buckets;
pub mod compare;
pub mod period;
pub mod ranking;
pub mod service;

pub use buckets::{Bucket, generate};
pub use compare::{ComparativeResult, Trend, compare};
pub use period::{PeriodRange, PeriodUnit, TimeRange, resolve};
pub use ranking::{RankedGroup, rank};
pub use service::{ESTIMATED_PROFIT_MARGIN, StatsService};

use async_trait::async_trait;
use serde::Deserialize;

use crate::db::repository::{RepoError, RepoResult};

/// Engine-level errors. Exactly two kinds: bad client input and a storage
/// collaborator that could not answer. Both are terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Invalid period unit '{got}': expected one of {allowed}")]
    InvalidPeriodUnit { got: String, allowed: String },

    #[error("Aggregation failed: {0}")]
    AggregationFailed(String),
}

impl From<RepoError> for StatsError {
    fn from(err: RepoError) -> Self {
        StatsError::AggregationFailed(err.to_string())
    }
}

/// Raw output of a time-ranged storage aggregation
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Aggregate {
    pub sum: f64,
    pub count: i64,
}

/// One grouped aggregation row (per product or per category)
#[derive(Debug, Clone, Deserialize)]
pub struct GroupedAggregate {
    /// Group key (product or category id)
    pub key: String,
    /// Display name, when the storage layer carries one
    pub name: Option<String>,
    /// Revenue sum for the group
    pub sum: f64,
    /// Distinct order count for the group
    pub count: i64,
    /// Units sold for the group
    pub quantity: i64,
}

/// All-time point totals backing the overview response
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LifetimeTotals {
    pub orders: i64,
    pub customers: i64,
    pub revenue: f64,
}

/// Which measure a [`AggregateStore::sum_and_count`] call aggregates.
///
/// The variant carries its canonical filter with it: order metrics cover
/// completed, non-deleted orders only; member metrics cover non-deleted
/// members created inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `sum` = completed order revenue, `count` = completed order count
    OrderRevenue,
    /// `count` = members registered inside the range (`sum` is 0)
    NewMembers,
}

/// Grouping axis for [`AggregateStore::grouped_sum_and_count`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Product,
    Category,
}

/// Storage collaborator seam.
///
/// The engine only ever consumes sums and counts; how they are produced
/// (SurrealQL here, anything else in tests) is not its concern.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// Sum + count of one metric over a half-open time range
    async fn sum_and_count(&self, metric: Metric, range: &TimeRange) -> RepoResult<Aggregate>;

    /// Grouped revenue rows over a half-open time range, ordered by the
    /// revenue metric descending
    async fn grouped_sum_and_count(
        &self,
        group: GroupKey,
        range: &TimeRange,
    ) -> RepoResult<Vec<GroupedAggregate>>;

    /// All-time totals (not period-compared)
    async fn lifetime_totals(&self) -> RepoResult<LifetimeTotals>;
}

/// Round to 2 decimal places (half-up away from zero, `f64::round` semantics)
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
