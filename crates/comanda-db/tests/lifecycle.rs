//! End-to-end checks of the order engine against a real SQLite store.

use comanda_core::{OrderStatus, TableStatus, TaxRate};
use comanda_db::migrations::{current_version, latest_version};
use comanda_db::{Database, DbConfig, DbError, Migration, SchemaMigrator};

const WAITER1: i64 = 2;

async fn seeded() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.seed_baseline().await.unwrap();
    db
}

async fn milanesa_id(db: &Database) -> i64 {
    db.menu()
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.name == "Milanesa")
        .map(|m| m.id)
        .unwrap()
}

#[tokio::test]
async fn two_dishes_with_tip_settle_to_expected_totals() {
    let db = Database::new(DbConfig::in_memory().run_migrations(false))
        .await
        .unwrap();
    let report = db.run_migrations().await.unwrap();
    assert_eq!(report.to_version, latest_version());
    db.seed_baseline().await.unwrap();

    let lifecycle = db.lifecycle(TaxRate::from_fraction(0.21));
    let dish = milanesa_id(&db).await;

    let order = lifecycle.create_order(1, WAITER1).await.unwrap();
    lifecycle.add_item(order.id, dish, None).await.unwrap();
    lifecycle.add_item(order.id, dish, None).await.unwrap();

    let settlement = lifecycle.close_and_settle(order.id, 0.1, 0.0).await.unwrap();
    assert_eq!(settlement.subtotal, 7000.0);
    assert_eq!(settlement.tax, 1470.0);
    assert_eq!(settlement.total, 9170.0);
}

#[tokio::test]
async fn open_order_marks_table_and_lists_order() {
    let db = seeded().await;
    let order = db
        .lifecycle(TaxRate::zero())
        .create_order(3, WAITER1)
        .await
        .unwrap();

    let table = db.tables().get_by_id(3).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.waiter_id, Some(WAITER1));

    let open = db.orders().list_open().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, order.id);
    assert_eq!(open[0].table_id, 3);
}

#[tokio::test]
async fn failure_between_order_insert_and_table_update_leaves_no_trace() {
    let db = seeded().await;
    sqlx::query(
        "CREATE TRIGGER block_table_update BEFORE UPDATE ON tables BEGIN SELECT RAISE(ABORT, 'forced'); END",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let err = db
        .lifecycle(TaxRate::zero())
        .create_order(1, WAITER1)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("forced"), "unexpected error: {err}");

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(orders, 0);

    let table = db.tables().get_by_id(1).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Free);
    assert_eq!(table.waiter_id, None);
}

#[tokio::test]
async fn open_orders_are_newest_first_and_exclude_closed() {
    let db = seeded().await;
    let lifecycle = db.lifecycle(TaxRate::zero());

    let first = lifecycle.create_order(1, WAITER1).await.unwrap();
    let second = lifecycle.create_order(2, WAITER1).await.unwrap();
    let third = lifecycle.create_order(3, WAITER1).await.unwrap();
    lifecycle.close_order(second.id).await.unwrap();

    let ids: Vec<i64> = db
        .orders()
        .list_open()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![third.id, first.id]);

    let closed = db.orders().get_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(closed.status, OrderStatus::Closed);
    let table = db.tables().get_by_id(2).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Free);
}

#[tokio::test]
async fn same_timestamp_orders_break_ties_by_id() {
    let db = seeded().await;
    let lifecycle = db.lifecycle(TaxRate::zero());
    let a = lifecycle.create_order(1, WAITER1).await.unwrap();
    let b = lifecycle.create_order(2, WAITER1).await.unwrap();

    sqlx::query("UPDATE orders SET created_at = '2026-01-01T12:00:00+00:00'")
        .execute(db.pool())
        .await
        .unwrap();

    let open = db.orders().list_open().await.unwrap();
    assert_eq!(open[0].id, b.id);
    assert_eq!(open[1].id, a.id);
}

#[tokio::test]
async fn migrations_survive_reopening_a_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restaurant.db");

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    db.seed_baseline().await.unwrap();
    let order = db
        .lifecycle(TaxRate::zero())
        .create_order(1, WAITER1)
        .await
        .unwrap();
    db.close().await;

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(db.schema_version().await.unwrap(), latest_version());
    assert!(db.orders().get_by_id(order.id).await.unwrap().is_some());
    assert_eq!(db.seed_baseline().await.unwrap().total(), 0);
}

#[tokio::test]
async fn later_migration_applies_on_top_of_existing_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("versions.db");
    let db = Database::new(DbConfig::new(&path).run_migrations(false))
        .await
        .unwrap();

    let v1 = Migration::new(1, "one", "CREATE TABLE one (x INTEGER);");
    let v2 = Migration::new(2, "two", "CREATE TABLE two (x INTEGER);");
    let v3 = Migration::new(3, "three", "CREATE TABLE three (x INTEGER);");

    SchemaMigrator::new(vec![v1]).run(db.pool()).await.unwrap();
    let report = SchemaMigrator::new(vec![v1, v2, v3])
        .run(db.pool())
        .await
        .unwrap();

    assert_eq!(report.from_version, 1);
    assert_eq!(report.applied, vec![2, 3]);
    assert_eq!(current_version(db.pool()).await.unwrap(), 3);
}

#[tokio::test]
async fn broken_migration_leaves_schema_version_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");
    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    db.close().await;

    // Schema already at the latest version; a bogus next migration fails
    let db = Database::new(DbConfig::new(&path).run_migrations(false))
        .await
        .unwrap();
    let next = latest_version() + 1;
    let err = SchemaMigrator::new(vec![Migration::new(next, "bad", "ALTER TABLE nowhere ADD COLUMN x;")])
        .run(db.pool())
        .await
        .unwrap_err();

    match err {
        DbError::MigrationFailed { version, .. } => assert_eq!(version, next),
        other => panic!("expected MigrationFailed, got {other:?}"),
    }
    assert_eq!(db.schema_version().await.unwrap(), latest_version());
}
