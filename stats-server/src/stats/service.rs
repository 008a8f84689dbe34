//! Statistics facade: the four standing dashboard queries
//!
//! Orchestrates the period resolver, bucket generator and calculators over an
//! [`AggregateStore`]. The facade never retries and never degrades partially:
//! a storage failure surfaces as [`StatsError::AggregationFailed`] unchanged.
//! Storage round trips are issued sequentially; they are independent reads,
//! so the result does not depend on their order.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::buckets;
use super::compare::{ComparativeResult, compare};
use super::period::{self, PeriodUnit, TimeRange};
use super::ranking::{RankedGroup, rank};
use super::{AggregateStore, GroupKey, Metric, StatsError, round2};

/// Estimated profit margin applied to revenue for the overview card.
/// Fixed business assumption with no configuration surface.
pub const ESTIMATED_PROFIT_MARGIN: f64 = 0.2;

// ============================================================================
// Response Types
// ============================================================================

/// One resolved `[start, end)` window, serialized in local wall time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeDto {
    pub start: String,
    pub end: String,
}

impl From<&TimeRange> for RangeDto {
    fn from(range: &TimeRange) -> Self {
        Self {
            start: format_local(range.start),
            end: format_local(range.end),
        }
    }
}

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeDto {
    pub current: RangeDto,
    pub previous: RangeDto,
}

/// All-time point totals (not period-compared)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeTotalsDto {
    pub total_orders: i64,
    pub total_customers: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub period: PeriodUnit,
    pub date_range: DateRangeDto,
    pub revenue: ComparativeResult,
    pub orders: ComparativeResult,
    pub new_customers: ComparativeResult,
    pub estimated_profit: ComparativeResult,
    pub totals: LifetimeTotalsDto,
}

/// Revenue line-chart data point
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueChartResponse {
    pub period: PeriodUnit,
    pub points: Vec<ChartPoint>,
}

/// Bar-chart point: a chart point plus its share of the series totals.
/// Shares follow the per-row rounding policy and may not sum to exactly 100.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartPoint {
    pub label: String,
    pub revenue: f64,
    pub orders: i64,
    pub revenue_percent: f64,
    pub orders_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBarChartResponse {
    pub period: PeriodUnit,
    pub total_revenue: f64,
    pub total_orders: i64,
    pub points: Vec<BarChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsResponse {
    pub period: PeriodUnit,
    pub date_range: RangeDto,
    pub products: Vec<RankedGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotalsDto {
    pub revenue: f64,
    pub orders: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenueResponse {
    pub period: PeriodUnit,
    pub date_range: RangeDto,
    pub totals: CategoryTotalsDto,
    pub categories: Vec<RankedGroup>,
}

// ============================================================================
// Facade
// ============================================================================

/// Stateless per-request orchestrator over an [`AggregateStore`]
#[derive(Clone)]
pub struct StatsService<S> {
    store: S,
}

impl<S: AggregateStore> StatsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overview statistics: comparatives for revenue, orders, new customers
    /// and estimated profit, plus all-time totals.
    pub async fn overview(
        &self,
        unit: PeriodUnit,
        now: NaiveDateTime,
    ) -> Result<OverviewResponse, StatsError> {
        let ranges = period::resolve(unit, now);

        let revenue_now = self
            .store
            .sum_and_count(Metric::OrderRevenue, &ranges.current)
            .await?;
        let revenue_prev = self
            .store
            .sum_and_count(Metric::OrderRevenue, &ranges.previous)
            .await?;
        let members_now = self
            .store
            .sum_and_count(Metric::NewMembers, &ranges.current)
            .await?;
        let members_prev = self
            .store
            .sum_and_count(Metric::NewMembers, &ranges.previous)
            .await?;
        let lifetime = self.store.lifetime_totals().await?;

        let profit_now = (revenue_now.sum * ESTIMATED_PROFIT_MARGIN).round();
        let profit_prev = (revenue_prev.sum * ESTIMATED_PROFIT_MARGIN).round();

        let average_order_value = if lifetime.orders > 0 {
            (lifetime.revenue / lifetime.orders as f64).round()
        } else {
            0.0
        };

        Ok(OverviewResponse {
            period: unit,
            date_range: DateRangeDto {
                current: (&ranges.current).into(),
                previous: (&ranges.previous).into(),
            },
            revenue: compare(revenue_now.sum, revenue_prev.sum),
            orders: compare(revenue_now.count as f64, revenue_prev.count as f64),
            new_customers: compare(members_now.count as f64, members_prev.count as f64),
            estimated_profit: compare(profit_now, profit_prev),
            totals: LifetimeTotalsDto {
                total_orders: lifetime.orders,
                total_customers: lifetime.customers,
                total_revenue: lifetime.revenue,
                average_order_value,
            },
        })
    }

    /// Revenue over a walking bucket series, oldest bucket first
    pub async fn revenue_chart(
        &self,
        unit: PeriodUnit,
        count: u32,
        now: NaiveDateTime,
    ) -> Result<RevenueChartResponse, StatsError> {
        let series = buckets::generate(unit, count, now);
        let mut points = Vec::with_capacity(series.len());
        for bucket in &series {
            let agg = self
                .store
                .sum_and_count(Metric::OrderRevenue, &bucket.range)
                .await?;
            points.push(ChartPoint {
                label: bucket.label.clone(),
                revenue: agg.sum,
                orders: agg.count,
            });
        }
        Ok(RevenueChartResponse {
            period: unit,
            points,
        })
    }

    /// Bar-chart variant: the same series plus each bucket's share of the
    /// series-wide revenue and order totals.
    pub async fn revenue_bar_chart(
        &self,
        unit: PeriodUnit,
        count: u32,
        now: NaiveDateTime,
    ) -> Result<RevenueBarChartResponse, StatsError> {
        let chart = self.revenue_chart(unit, count, now).await?;

        let total_revenue: f64 = chart.points.iter().map(|p| p.revenue).sum();
        let total_orders: i64 = chart.points.iter().map(|p| p.orders).sum();

        let points = chart
            .points
            .into_iter()
            .map(|p| BarChartPoint {
                revenue_percent: share(p.revenue, total_revenue),
                orders_percent: share(p.orders as f64, total_orders as f64),
                label: p.label,
                revenue: p.revenue,
                orders: p.orders,
            })
            .collect();

        Ok(RevenueBarChartResponse {
            period: unit,
            total_revenue,
            total_orders,
            points,
        })
    }

    /// Top products by revenue inside the current window, truncated to
    /// `limit` after full ranking.
    pub async fn top_products(
        &self,
        unit: PeriodUnit,
        limit: usize,
        now: NaiveDateTime,
    ) -> Result<TopProductsResponse, StatsError> {
        let current = period::resolve(unit, now).current;
        let groups = self
            .store
            .grouped_sum_and_count(GroupKey::Product, &current)
            .await?;

        let total_sum: f64 = groups.iter().map(|g| g.sum).sum();
        let mut products = rank(groups, total_sum);
        products.truncate(limit);

        Ok(TopProductsResponse {
            period: unit,
            date_range: (&current).into(),
            products,
        })
    }

    /// Category revenue distribution inside the current window (no
    /// truncation), with grand totals across all categories.
    pub async fn category_revenue(
        &self,
        unit: PeriodUnit,
        now: NaiveDateTime,
    ) -> Result<CategoryRevenueResponse, StatsError> {
        let current = period::resolve(unit, now).current;
        let groups = self
            .store
            .grouped_sum_and_count(GroupKey::Category, &current)
            .await?;

        let totals = CategoryTotalsDto {
            revenue: groups.iter().map(|g| g.sum).sum(),
            orders: groups.iter().map(|g| g.count).sum(),
            quantity: groups.iter().map(|g| g.quantity).sum(),
        };

        let categories = rank(groups, totals.revenue);

        Ok(CategoryRevenueResponse {
            period: unit,
            date_range: (&current).into(),
            totals,
            categories,
        })
    }
}

/// Per-row share of a series total (0 when the total is zero)
fn share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        round2(value / total * 100.0)
    } else {
        0.0
    }
}
