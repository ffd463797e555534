//! # Order Lifecycle
//!
//! State transitions that keep orders and table occupancy consistent.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  create_order(table, waiter)        ┌─ one transaction ─────────────┐  │
//! │       │                             │ check table exists            │  │
//! │       │                             │ INSERT orders (open)          │  │
//! │       │                             │ UPDATE tables → occupied      │  │
//! │       ▼                             └───────────────────────────────┘  │
//! │  add_item(order, dish, notes)   ──► INSERT order_items (requested)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update_item_status(item, s)    ──► UPDATE order_items (any → any)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  close_and_settle(order, tip, discount)                                │
//! │       │                         ──► read priced items, compute totals  │
//! │       │                             (no writes)                         │
//! │       ▼                             ┌─ one transaction ─────────────┐  │
//! │  close_order(order)             ──► │ UPDATE orders → closed        │  │
//! │                                     │ free table if no open order   │  │
//! │                                     │ remains on it                 │  │
//! │                                     └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If any statement of a transaction fails, the transaction is rolled
//! back and the error returned; none of its writes are visible.

use comanda_core::{
    settle, Order, OrderItem, OrderItemStatus, OrderStatus, Settlement, SettlementRequest,
    TableStatus, TaxRate,
};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{error, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::order::OrderRepository;
use crate::repository::table::TableRepository;

/// Order and table state transitions over one [`Database`].
#[derive(Debug, Clone, Copy)]
pub struct OrderLifecycle<'a> {
    db: &'a Database,
    tax_rate: TaxRate,
}

impl<'a> OrderLifecycle<'a> {
    pub fn new(db: &'a Database, tax_rate: TaxRate) -> Self {
        OrderLifecycle { db, tax_rate }
    }

    /// Tax rate applied by [`close_and_settle`](Self::close_and_settle).
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Opens an order on a table and marks the table occupied by the waiter.
    ///
    /// Opening a second order on an occupied table is allowed; the table
    /// is reassigned to the new waiter.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown table
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown waiter
    pub async fn create_order(&self, table_id: i64, waiter_id: i64) -> DbResult<Order> {
        let mut tx = self.begin().await?;
        let outcome = Self::open_in(&mut *tx, table_id, waiter_id).await;
        let order = finish(tx, outcome).await?;

        info!(order_id = order.id, table_id, waiter_id, "Order opened");
        Ok(order)
    }

    async fn open_in(conn: &mut SqliteConnection, table_id: i64, waiter_id: i64) -> DbResult<Order> {
        let status = TableRepository::status_in(&mut *conn, table_id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", table_id))?;

        if status == TableStatus::Occupied {
            warn!(table_id, waiter_id, "Opening another order on an occupied table");
        }

        let order = OrderRepository::insert_open(&mut *conn, table_id, waiter_id).await?;
        TableRepository::occupy(&mut *conn, table_id, waiter_id).await?;

        Ok(order)
    }

    /// Appends a dish to an order with status `requested`.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown order or menu item
    pub async fn add_item(
        &self,
        order_id: i64,
        menu_item_id: i64,
        notes: Option<&str>,
    ) -> DbResult<OrderItem> {
        self.db.orders().add_item(order_id, menu_item_id, notes).await
    }

    /// Sets an item's kitchen status.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown item
    pub async fn update_item_status(&self, item_id: i64, status: OrderItemStatus) -> DbResult<()> {
        self.db.orders().set_item_status(item_id, status).await
    }

    /// Computes the totals of an order. Writes nothing.
    ///
    /// Every item counts at its current menu price, whatever its status.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - tip rate or discount negative or not finite
    /// * `Err(DbError::NotFound)` - Unknown order
    pub async fn close_and_settle(
        &self,
        order_id: i64,
        tip_rate: f64,
        discount: f64,
    ) -> DbResult<Settlement> {
        let request = SettlementRequest::new(tip_rate, discount);
        request.validate()?;

        let orders = self.db.orders();
        if orders.get_by_id(order_id).await?.is_none() {
            return Err(DbError::not_found("Order", order_id));
        }

        let prices: Vec<f64> = orders
            .list_priced_items(order_id)
            .await?
            .into_iter()
            .map(|item| item.price)
            .collect();

        let settlement = settle(&prices, self.tax_rate, request);

        info!(
            order_id,
            items = prices.len(),
            subtotal = settlement.subtotal,
            total = settlement.total,
            "Order settled"
        );
        Ok(settlement)
    }

    /// Closes an open order. Its table becomes free, unless another open
    /// order remains on it.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown order
    /// * `Err(DbError::InvalidState)` - Order already closed
    pub async fn close_order(&self, order_id: i64) -> DbResult<Order> {
        let mut tx = self.begin().await?;
        let outcome = Self::close_in(&mut *tx, order_id).await;
        let (order, table_freed) = finish(tx, outcome).await?;

        info!(order_id, table_id = order.table_id, table_freed, "Order closed");
        Ok(order)
    }

    async fn close_in(conn: &mut SqliteConnection, order_id: i64) -> DbResult<(Order, bool)> {
        let mut order = OrderRepository::get_in(&mut *conn, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        if !OrderRepository::mark_closed(&mut *conn, order_id).await? {
            return Err(DbError::invalid_state(
                "Order",
                order_id,
                order.status.as_str(),
                "close",
            ));
        }
        order.status = OrderStatus::Closed;

        let still_open = OrderRepository::count_open_for_table(&mut *conn, order.table_id).await?;
        let table_freed = still_open == 0;
        if table_freed {
            TableRepository::release(&mut *conn, order.table_id).await?;
        }

        Ok((order, table_freed))
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.db
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

/// Commits on success, rolls back on failure.
async fn finish<T>(tx: Transaction<'static, Sqlite>, outcome: DbResult<T>) -> DbResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.seed_baseline().await.unwrap();
        db
    }

    const WAITER1: i64 = 2;
    const WAITER2: i64 = 3;

    #[tokio::test]
    async fn test_create_order_occupies_table() {
        let db = seeded().await;
        let order = db.lifecycle(TaxRate::zero()).create_order(4, WAITER1).await.unwrap();

        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.table_id, 4);

        let table = db.tables().get_by_id(4).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.waiter_id, Some(WAITER1));
    }

    #[tokio::test]
    async fn test_create_order_unknown_table_writes_nothing() {
        let db = seeded().await;
        let err = db.lifecycle(TaxRate::zero()).create_order(999, WAITER1).await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.orders().count_open().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_order_unknown_waiter_rolls_back() {
        let db = seeded().await;
        let err = db.lifecycle(TaxRate::zero()).create_order(1, 999).await.unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(db.orders().count_open().await.unwrap(), 0);
        let table = db.tables().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Free);
    }

    #[tokio::test]
    async fn test_second_open_order_on_occupied_table() {
        let db = seeded().await;
        let lifecycle = db.lifecycle(TaxRate::zero());
        lifecycle.create_order(1, WAITER1).await.unwrap();
        lifecycle.create_order(1, WAITER2).await.unwrap();

        assert_eq!(db.orders().count_open().await.unwrap(), 2);
        let table = db.tables().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(table.waiter_id, Some(WAITER2));
    }

    #[tokio::test]
    async fn test_close_order_frees_table_after_last_open_order() {
        let db = seeded().await;
        let lifecycle = db.lifecycle(TaxRate::zero());
        let first = lifecycle.create_order(1, WAITER1).await.unwrap();
        let second = lifecycle.create_order(1, WAITER1).await.unwrap();

        lifecycle.close_order(first.id).await.unwrap();
        let table = db.tables().get_by_id(1).await.unwrap().unwrap();
        assert!(table.is_occupied());

        let closed = lifecycle.close_order(second.id).await.unwrap();
        assert_eq!(closed.status, OrderStatus::Closed);
        let table = db.tables().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Free);
        assert_eq!(table.waiter_id, None);
        assert!(db.orders().list_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_order_twice_or_unknown() {
        let db = seeded().await;
        let lifecycle = db.lifecycle(TaxRate::zero());
        let order = lifecycle.create_order(1, WAITER1).await.unwrap();
        lifecycle.close_order(order.id).await.unwrap();

        assert!(matches!(
            lifecycle.close_order(order.id).await,
            Err(DbError::InvalidState { .. })
        ));
        assert!(matches!(
            lifecycle.close_order(order.id + 100).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_settle_is_read_only_and_counts_every_item() {
        let db = seeded().await;
        let lifecycle = db.lifecycle(TaxRate::from_fraction(0.21));
        let order = lifecycle.create_order(1, WAITER1).await.unwrap();
        let coffee = db
            .menu()
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|m| m.name == "Coffee")
            .unwrap();

        let item = lifecycle.add_item(order.id, coffee.id, None).await.unwrap();
        lifecycle.add_item(order.id, coffee.id, Some("decaf")).await.unwrap();
        lifecycle
            .update_item_status(item.id, OrderItemStatus::Served)
            .await
            .unwrap();

        let settlement = lifecycle.close_and_settle(order.id, 0.0, 0.0).await.unwrap();
        assert_eq!(settlement.subtotal, 1800.0);
        assert_eq!(settlement.tax, 1800.0 * 0.21);

        let stored = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_settle_empty_order_and_errors() {
        let db = seeded().await;
        let lifecycle = db.lifecycle(TaxRate::from_fraction(0.21));
        let order = lifecycle.create_order(1, WAITER1).await.unwrap();

        let settlement = lifecycle.close_and_settle(order.id, 0.1, 0.0).await.unwrap();
        assert_eq!(settlement.subtotal, 0.0);
        assert_eq!(settlement.total, 0.0);

        assert!(matches!(
            lifecycle.close_and_settle(order.id + 1, 0.1, 0.0).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            lifecycle.close_and_settle(order.id, f64::NAN, 0.0).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            lifecycle.close_and_settle(order.id, 0.1, -5.0).await,
            Err(DbError::Validation(_))
        ));
    }
}
