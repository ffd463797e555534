//! # Report Repository
//!
//! Read-only aggregations for the sales export.
//!
//! ```text
//! orders ──┬── tables       (table_name)
//!          ├── users        (waiter_name)
//!          └── order_items ── menu_items   SUM(price) → gross_subtotal
//!
//! WHERE DATE(orders.created_at) = :date      (UTC calendar day)
//! ```
//!
//! The gross subtotal is the plain sum of menu prices. Tax, tip and
//! discount are applied per settlement and are not stored, so they are
//! not part of this report.

use chrono::NaiveDate;
use comanda_core::DailySalesRow;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// One row per order created on `date` that has at least one item,
    /// ordered by order id.
    pub async fn daily_sales(&self, date: NaiveDate) -> DbResult<Vec<DailySalesRow>> {
        let day = date.format("%Y-%m-%d").to_string();

        debug!(date = %day, "Aggregating daily sales");

        let rows = sqlx::query_as::<_, DailySalesRow>(
            r#"
            SELECT
                o.id         AS order_id,
                t.name       AS table_name,
                u.username   AS waiter_name,
                SUM(m.price) AS gross_subtotal
            FROM orders o
            INNER JOIN tables t       ON t.id = o.table_id
            INNER JOIN users u        ON u.id = o.waiter_id
            INNER JOIN order_items oi ON oi.order_id = o.id
            INNER JOIN menu_items m   ON m.id = oi.menu_item_id
            WHERE DATE(o.created_at) = ?1
            GROUP BY o.id, t.name, u.username
            ORDER BY o.id
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, Utc};
    use comanda_core::TaxRate;

    #[tokio::test]
    async fn test_daily_sales_sums_prices_for_the_day_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.seed_baseline().await.unwrap();

        let menu = db.menu().list().await.unwrap();
        let coffee = menu.iter().find(|m| m.name == "Coffee").unwrap();
        let flan = menu.iter().find(|m| m.name == "Flan").unwrap();
        let waiter = db.users().find_by_username("waiter1").await.unwrap().unwrap();

        let lifecycle = db.lifecycle(TaxRate::from_fraction(0.21));
        let today = lifecycle.create_order(1, waiter.id).await.unwrap();
        db.orders().add_item(today.id, coffee.id, None).await.unwrap();
        db.orders().add_item(today.id, flan.id, None).await.unwrap();

        let old = lifecycle.create_order(2, waiter.id).await.unwrap();
        db.orders().add_item(old.id, coffee.id, None).await.unwrap();
        sqlx::query("UPDATE orders SET created_at = '2020-01-01T12:00:00+00:00' WHERE id = ?1")
            .bind(old.id)
            .execute(db.pool())
            .await
            .unwrap();

        // No items: not a sale
        lifecycle.create_order(3, waiter.id).await.unwrap();

        let rows = db.reports().daily_sales(Utc::now().date_naive()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, today.id);
        assert_eq!(rows[0].table_name, "Table 1");
        assert_eq!(rows[0].waiter_name, "waiter1");
        assert_eq!(rows[0].gross_subtotal, coffee.price + flan.price);

        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let rows = db.reports().daily_sales(past).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gross_subtotal, coffee.price);
    }
}
