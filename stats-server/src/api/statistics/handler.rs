//! Statistics API Handlers
//!
//! Thin HTTP layer over the statistics engine: parses the `period` selector
//! (failing fast on anything outside the operation's allowed set, before any
//! storage access), resolves "now" in the business timezone, and delegates to
//! the facade.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::stats::PeriodUnit;
use crate::stats::service::{
    CategoryRevenueResponse, OverviewResponse, RevenueBarChartResponse, RevenueChartResponse,
    TopProductsResponse,
};
use crate::utils::AppResult;
use crate::utils::time;

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    #[serde(default = "default_period_day")]
    pub period: String,
}

#[derive(Debug, Deserialize)]
pub struct RevenueChartQuery {
    #[serde(default = "default_period_month")]
    pub period: String,
    /// Number of buckets to walk back from the current window
    #[serde(default = "default_months")]
    pub months: u32,
}

#[derive(Debug, Deserialize)]
pub struct RevenueBarChartQuery {
    #[serde(default = "default_period_day")]
    pub period: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    #[serde(default = "default_period_month")]
    pub period: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRevenueQuery {
    #[serde(default = "default_period_month")]
    pub period: String,
}

fn default_period_day() -> String {
    "day".to_string()
}

fn default_period_month() -> String {
    "month".to_string()
}

fn default_months() -> u32 {
    12
}

fn default_count() -> u32 {
    24
}

fn default_limit() -> usize {
    10
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/statistics/overview - Comparative overview statistics
pub async fn get_overview(
    State(state): State<ServerState>,
    Query(query): Query<OverviewQuery>,
) -> AppResult<Json<OverviewResponse>> {
    let unit = PeriodUnit::parse(&query.period)?;
    let now = time::business_now(state.config.timezone);

    tracing::debug!(period = %unit, "Fetching overview statistics");

    let response = state.stats().overview(unit, now).await?;
    Ok(Json(response))
}

/// GET /api/statistics/revenue-chart - Revenue trend over walking buckets
pub async fn get_revenue_chart(
    State(state): State<ServerState>,
    Query(query): Query<RevenueChartQuery>,
) -> AppResult<Json<RevenueChartResponse>> {
    let unit = PeriodUnit::parse_allowed(&query.period, &PeriodUnit::CHART)?;
    let now = time::business_now(state.config.timezone);
    let count = query.months.max(1);

    tracing::debug!(period = %unit, count, "Fetching revenue chart");

    let response = state.stats().revenue_chart(unit, count, now).await?;
    Ok(Json(response))
}

/// GET /api/statistics/revenue-bar-chart - Revenue buckets with series shares
pub async fn get_revenue_bar_chart(
    State(state): State<ServerState>,
    Query(query): Query<RevenueBarChartQuery>,
) -> AppResult<Json<RevenueBarChartResponse>> {
    let unit = PeriodUnit::parse(&query.period)?;
    let now = time::business_now(state.config.timezone);
    let count = query.count.max(1);

    tracing::debug!(period = %unit, count, "Fetching revenue bar chart");

    let response = state.stats().revenue_bar_chart(unit, count, now).await?;
    Ok(Json(response))
}

/// GET /api/statistics/top-products - Top products by revenue
pub async fn get_top_products(
    State(state): State<ServerState>,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Json<TopProductsResponse>> {
    let unit = PeriodUnit::parse(&query.period)?;
    let now = time::business_now(state.config.timezone);
    let limit = query.limit.max(1);

    tracing::debug!(period = %unit, limit, "Fetching top products");

    let response = state.stats().top_products(unit, limit, now).await?;
    Ok(Json(response))
}

/// GET /api/statistics/category-revenue - Category revenue distribution
pub async fn get_category_revenue(
    State(state): State<ServerState>,
    Query(query): Query<CategoryRevenueQuery>,
) -> AppResult<Json<CategoryRevenueResponse>> {
    let unit = PeriodUnit::parse(&query.period)?;
    let now = time::business_now(state.config.timezone);

    tracing::debug!(period = %unit, "Fetching category revenue distribution");

    let response = state.stats().category_revenue(unit, now).await?;
    Ok(Json(response))
}
