//! Statistics API 模块 (数据统计)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/overview", get(handler::get_overview))
        .route("/revenue-chart", get(handler::get_revenue_chart))
        .route("/revenue-bar-chart", get(handler::get_revenue_bar_chart))
        .route("/top-products", get(handler::get_top_products))
        .route("/category-revenue", get(handler::get_category_revenue))
}
