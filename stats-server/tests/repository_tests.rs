//! StatsRepository integration tests against an embedded SurrealDB
//!
//! Seeds a throwaway RocksDB-backed instance with orders, items and members,
//! then checks the aggregation queries: range filtering, completed-only and
//! soft-delete exclusion, and distinct order counting in grouped rows.

use chrono::{NaiveDate, NaiveDateTime};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use stats_server::db::repository::StatsRepository;
use stats_server::stats::{AggregateStore, GroupKey, Metric, TimeRange};

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

/// Millis matching the repository's conversion under the UTC test timezone
fn millis(naive: NaiveDateTime) -> i64 {
    naive.and_utc().timestamp_millis()
}

/// Returns the seeded handle plus the backing temp dir, which must stay
/// alive for the duration of the test.
async fn seed_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("retail").use_db("backoffice").await.unwrap();

    // Two completed orders inside 2025-06-10, one the day before, plus a
    // voided and a soft-deleted order that must never be counted.
    let orders = [
        ("o1", "COMPLETED", false, millis(dt(2025, 6, 10, 12)), 30.0),
        ("o2", "COMPLETED", false, millis(dt(2025, 6, 10, 19)), 50.0),
        ("o3", "COMPLETED", false, millis(dt(2025, 6, 9, 13)), 20.0),
        ("o4", "VOID", false, millis(dt(2025, 6, 10, 15)), 99.0),
        ("o5", "COMPLETED", true, millis(dt(2025, 6, 10, 16)), 77.0),
    ];
    for (id, status, deleted, end_time, total) in orders {
        db.query(
            "CREATE type::thing('order', $id) SET status = $status, deleted = $deleted,
             end_time = $end_time, total_amount = $total",
        )
        .bind(("id", id))
        .bind(("status", status.to_string()))
        .bind(("deleted", deleted))
        .bind(("end_time", end_time))
        .bind(("total", total))
        .await
        .unwrap();
    }

    // Item lines: espresso appears on both completed orders, latte on one
    let items = [
        ("i1", "o1", "espresso", "Espresso", "drinks", "Drinks", 20.0, 2_i64),
        ("i2", "o1", "latte", "Latte", "drinks", "Drinks", 10.0, 1),
        ("i3", "o2", "espresso", "Espresso", "drinks", "Drinks", 50.0, 5),
        ("i4", "o5", "espresso", "Espresso", "drinks", "Drinks", 70.0, 7),
    ];
    for (id, order, product, name, category, category_name, line_total, quantity) in items {
        db.query(
            "CREATE type::thing('item', $id) SET product_id = type::thing('product', $product),
             name = $name, category_id = type::thing('category', $category),
             category_name = $category_name, line_total = $line_total, quantity = $quantity",
        )
        .bind(("id", id))
        .bind(("product", product))
        .bind(("name", name.to_string()))
        .bind(("category", category))
        .bind(("category_name", category_name.to_string()))
        .bind(("line_total", line_total))
        .bind(("quantity", quantity))
        .await
        .unwrap();
        db.query("RELATE (type::thing('order', $order))->has_item->(type::thing('item', $item))")
            .bind(("order", order))
            .bind(("item", id))
            .await
            .unwrap();
    }

    // Members: one registered inside the day, one before, one soft-deleted
    let members = [
        ("m1", false, millis(dt(2025, 6, 10, 9))),
        ("m2", false, millis(dt(2025, 6, 1, 9))),
        ("m3", true, millis(dt(2025, 6, 10, 11))),
    ];
    for (id, deleted, created_at) in members {
        db.query("CREATE type::thing('member', $id) SET deleted = $deleted, created_at = $created_at")
            .bind(("id", id))
            .bind(("deleted", deleted))
            .bind(("created_at", created_at))
            .await
            .unwrap();
    }

    (db, tmp)
}

fn day_range() -> TimeRange {
    TimeRange::new(dt(2025, 6, 10, 0), dt(2025, 6, 11, 0))
}

#[tokio::test]
async fn order_revenue_counts_completed_non_deleted_in_range() {
    let (db, _guard) = seed_db().await;
    let repo = StatsRepository::new(db, chrono_tz::UTC);

    let agg = repo
        .sum_and_count(Metric::OrderRevenue, &day_range())
        .await
        .unwrap();

    // o1 + o2 only: voided, deleted and out-of-range orders are excluded
    assert_eq!(agg.sum, 80.0);
    assert_eq!(agg.count, 2);
}

#[tokio::test]
async fn new_members_excludes_deleted_and_out_of_range() {
    let (db, _guard) = seed_db().await;
    let repo = StatsRepository::new(db, chrono_tz::UTC);

    let agg = repo
        .sum_and_count(Metric::NewMembers, &day_range())
        .await
        .unwrap();

    assert_eq!(agg.count, 1);
}

#[tokio::test]
async fn grouped_products_sum_lines_and_count_distinct_orders() {
    let (db, _guard) = seed_db().await;
    let repo = StatsRepository::new(db, chrono_tz::UTC);

    let groups = repo
        .grouped_sum_and_count(GroupKey::Product, &day_range())
        .await
        .unwrap();

    assert_eq!(groups.len(), 2);

    // espresso: 20 (o1) + 50 (o2) over two distinct orders, 7 units
    let espresso = groups
        .iter()
        .find(|g| g.name.as_deref() == Some("Espresso"))
        .unwrap();
    assert_eq!(espresso.sum, 70.0);
    assert_eq!(espresso.count, 2);
    assert_eq!(espresso.quantity, 7);

    let latte = groups
        .iter()
        .find(|g| g.name.as_deref() == Some("Latte"))
        .unwrap();
    assert_eq!(latte.sum, 10.0);
    assert_eq!(latte.count, 1);

    // ordered by revenue descending
    assert_eq!(groups[0].name.as_deref(), Some("Espresso"));
}

#[tokio::test]
async fn grouped_categories_roll_up_all_lines() {
    let (db, _guard) = seed_db().await;
    let repo = StatsRepository::new(db, chrono_tz::UTC);

    let groups = repo
        .grouped_sum_and_count(GroupKey::Category, &day_range())
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name.as_deref(), Some("Drinks"));
    assert_eq!(groups[0].sum, 80.0);
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].quantity, 8);
}

#[tokio::test]
async fn lifetime_totals_span_all_time() {
    let (db, _guard) = seed_db().await;
    let repo = StatsRepository::new(db, chrono_tz::UTC);

    let totals = repo.lifetime_totals().await.unwrap();

    // all completed non-deleted orders regardless of date
    assert_eq!(totals.orders, 3);
    assert_eq!(totals.revenue, 100.0);
    assert_eq!(totals.customers, 2);
}
