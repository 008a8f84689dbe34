//! Statistics Repository
//!
//! SurrealQL implementation of the [`AggregateStore`] seam. All queries
//! exclude soft-deleted rows, and revenue metrics only count COMPLETED
//! orders. Time ranges arrive as business-local wall time and are converted
//! to Unix millis here; the database stores `end_time`/`created_at` as
//! millis.

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult};
use crate::stats::{
    Aggregate, AggregateStore, GroupKey, GroupedAggregate, LifetimeTotals, Metric, TimeRange,
};

#[derive(Clone)]
pub struct StatsRepository {
    base: BaseRepository,
    tz: chrono_tz::Tz,
}

impl StatsRepository {
    pub fn new(db: Surreal<Db>, tz: chrono_tz::Tz) -> Self {
        Self {
            base: BaseRepository::new(db),
            tz,
        }
    }

    async fn order_revenue(&self, start: i64, end: i64) -> RepoResult<Aggregate> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $completed = SELECT total_amount FROM order
                    WHERE status = 'COMPLETED'
                    AND deleted = false
                    AND end_time >= $start
                    AND end_time < $end;

                RETURN {
                    sum: math::sum($completed.total_amount) OR 0,
                    count: count($completed)
                }
            "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let aggregate: Option<Aggregate> = result.take(1)?;
        Ok(aggregate.unwrap_or_default())
    }

    async fn new_members(&self, start: i64, end: i64) -> RepoResult<Aggregate> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $members = SELECT id FROM member
                    WHERE deleted = false
                    AND created_at >= $start
                    AND created_at < $end;

                RETURN {
                    sum: 0.0,
                    count: count($members)
                }
            "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let aggregate: Option<Aggregate> = result.take(1)?;
        Ok(aggregate.unwrap_or_default())
    }
}

#[async_trait]
impl AggregateStore for StatsRepository {
    async fn sum_and_count(&self, metric: Metric, range: &TimeRange) -> RepoResult<Aggregate> {
        let (start, end) = range.to_millis(self.tz);
        match metric {
            Metric::OrderRevenue => self.order_revenue(start, end).await,
            Metric::NewMembers => self.new_members(start, end).await,
        }
    }

    async fn grouped_sum_and_count(
        &self,
        group: GroupKey,
        range: &TimeRange,
    ) -> RepoResult<Vec<GroupedAggregate>> {
        let (start, end) = range.to_millis(self.tz);

        // Item lines reached via graph edge traversal from completed orders.
        // Distinct order count per group follows the grouped-breakdown idiom:
        // collect order ids per row set, then dedup inside the GROUP BY.
        let query = match group {
            GroupKey::Product => {
                r#"
                LET $completed_ids = (
                    SELECT VALUE id FROM order
                    WHERE status = 'COMPLETED'
                    AND deleted = false
                    AND end_time >= $start
                    AND end_time < $end
                );

                LET $lines = (
                    SELECT
                        <string>out.product_id AS key,
                        out.name AS name,
                        out.line_total AS line_total,
                        out.quantity AS quantity,
                        in AS order_id
                    FROM has_item
                    WHERE in IN $completed_ids
                );

                SELECT
                    key,
                    name,
                    math::sum(line_total) AS sum,
                    array::len(array::distinct(array::group(order_id))) AS count,
                    math::sum(quantity) AS quantity
                FROM $lines
                GROUP BY key, name
                ORDER BY sum DESC
            "#
            }
            GroupKey::Category => {
                r#"
                LET $completed_ids = (
                    SELECT VALUE id FROM order
                    WHERE status = 'COMPLETED'
                    AND deleted = false
                    AND end_time >= $start
                    AND end_time < $end
                );

                LET $lines = (
                    SELECT
                        <string>out.category_id AS key,
                        out.category_name AS name,
                        out.line_total AS line_total,
                        out.quantity AS quantity,
                        in AS order_id
                    FROM has_item
                    WHERE in IN $completed_ids
                );

                SELECT
                    key,
                    name,
                    math::sum(line_total) AS sum,
                    array::len(array::distinct(array::group(order_id))) AS count,
                    math::sum(quantity) AS quantity
                FROM $lines
                GROUP BY key, name
                ORDER BY sum DESC
            "#
            }
        };

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let groups: Vec<GroupedAggregate> = result.take(2)?;
        Ok(groups)
    }

    async fn lifetime_totals(&self) -> RepoResult<LifetimeTotals> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $completed = SELECT total_amount FROM order
                    WHERE status = 'COMPLETED'
                    AND deleted = false;
                LET $members = SELECT id FROM member WHERE deleted = false;

                RETURN {
                    orders: count($completed),
                    customers: count($members),
                    revenue: math::sum($completed.total_amount) OR 0
                }
            "#,
            )
            .await?;

        let totals: Option<LifetimeTotals> = result.take(2)?;
        Ok(totals.unwrap_or_default())
    }
}
