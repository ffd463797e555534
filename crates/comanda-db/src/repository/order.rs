//! # Order Repository
//!
//! Orders and their items.
//!
//! ## Record Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Data Model                                     │
//! │                                                                         │
//! │  ┌─────────────┐          ┌─────────────────┐         ┌──────────────┐ │
//! │  │   orders    │ 1      * │   order_items   │ *     1 │  menu_items  │ │
//! │  │─────────────│─────────►│─────────────────│────────►│──────────────│ │
//! │  │ table_id    │          │ order_id (FK)   │         │ name, price  │ │
//! │  │ waiter_id   │          │ menu_item_id    │         └──────────────┘ │
//! │  │ status      │          │ status, notes   │                          │
//! │  │ created_at  │          └─────────────────┘                          │
//! │  └─────────────┘                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items carry no price of their own. Settlement joins each item with the
//! current menu price.

use chrono::Utc;
use comanda_core::validation::normalize_notes;
use comanda_core::{Order, OrderItem, OrderItemStatus, OrderStatus, PricedOrderItem};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for orders and order items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut *conn, id).await
    }

    /// Lists open orders, newest first. Orders created at the same
    /// instant are ordered by id, newest first.
    pub async fn list_open(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, table_id, waiter_id, status, created_at
            FROM orders
            WHERE status = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(OrderStatus::Open)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Number of open orders.
    pub async fn count_open(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?1")
            .bind(OrderStatus::Open)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Order Items
    // =========================================================================

    /// Appends an item to an order with status `requested`.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown order or menu item
    pub async fn add_item(
        &self,
        order_id: i64,
        menu_item_id: i64,
        notes: Option<&str>,
    ) -> DbResult<OrderItem> {
        let notes = normalize_notes(notes)?;

        debug!(order_id, menu_item_id, "Adding order item");

        let result = sqlx::query(
            r#"
            INSERT INTO order_items (order_id, menu_item_id, status, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order_id)
        .bind(menu_item_id)
        .bind(OrderItemStatus::Requested)
        .bind(&notes)
        .execute(&self.pool)
        .await?;

        Ok(OrderItem {
            id: result.last_insert_rowid(),
            order_id,
            menu_item_id,
            status: OrderItemStatus::Requested,
            notes,
        })
    }

    /// Sets the kitchen status of an item. Any status may follow any other.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown item
    pub async fn set_item_status(&self, item_id: i64, status: OrderItemStatus) -> DbResult<()> {
        debug!(item_id, status = %status, "Updating order item status");

        let result = sqlx::query("UPDATE order_items SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order item", item_id));
        }

        Ok(())
    }

    /// Gets an order item by ID.
    pub async fn get_item(&self, item_id: i64) -> DbResult<Option<OrderItem>> {
        let item = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, menu_item_id, status, notes FROM order_items WHERE id = ?1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the items of an order.
    ///
    /// Returned in insertion order; callers should not depend on it.
    pub async fn list_items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, menu_item_id, status, notes
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the items of an order with the current menu name and price.
    pub async fn list_priced_items(&self, order_id: i64) -> DbResult<Vec<PricedOrderItem>> {
        let items = sqlx::query_as::<_, PricedOrderItem>(
            r#"
            SELECT oi.id, oi.menu_item_id, m.name, m.price, oi.status, oi.notes
            FROM order_items oi
            INNER JOIN menu_items m ON m.id = oi.menu_item_id
            WHERE oi.order_id = ?1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Transaction helpers
    // =========================================================================

    pub(crate) async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, table_id, waiter_id, status, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    /// Inserts an open order stamped with the current time.
    pub(crate) async fn insert_open(
        conn: &mut SqliteConnection,
        table_id: i64,
        waiter_id: i64,
    ) -> DbResult<Order> {
        let created_at = Utc::now();

        debug!(table_id, waiter_id, "Inserting order");

        let result = sqlx::query(
            r#"
            INSERT INTO orders (table_id, waiter_id, status, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(table_id)
        .bind(waiter_id)
        .bind(OrderStatus::Open)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(Order {
            id: result.last_insert_rowid(),
            table_id,
            waiter_id,
            status: OrderStatus::Open,
            created_at,
        })
    }

    /// Closes an open order. Returns false if no open order had that id.
    pub(crate) async fn mark_closed(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
        debug!(id, "Closing order");

        let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2 AND status = ?3")
            .bind(OrderStatus::Closed)
            .bind(id)
            .bind(OrderStatus::Open)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Number of open orders on a table.
    pub(crate) async fn count_open_for_table(
        conn: &mut SqliteConnection,
        table_id: i64,
    ) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE table_id = ?1 AND status = ?2")
                .bind(table_id)
                .bind(OrderStatus::Open)
                .fetch_one(&mut *conn)
                .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use comanda_core::{NewMenuItem, Role, TaxRate};

    struct Fixture {
        db: Database,
        table_id: i64,
        waiter_id: i64,
        dish_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let waiter = db.users().create("waiter1", Role::Waiter, "pw").await.unwrap();
        let table = db.tables().create("Table 1").await.unwrap();
        let dish = db
            .menu()
            .create(&NewMenuItem {
                name: "Milanesa".to_string(),
                category: "Main".to_string(),
                price: 3500.0,
                cost: 1500.0,
                stock: 20,
                photo: None,
            })
            .await
            .unwrap();

        Fixture {
            db,
            table_id: table.id,
            waiter_id: waiter.id,
            dish_id: dish.id,
        }
    }

    #[tokio::test]
    async fn test_add_item_defaults_to_requested() {
        let f = fixture().await;
        let order = f
            .db
            .lifecycle(TaxRate::zero())
            .create_order(f.table_id, f.waiter_id)
            .await
            .unwrap();

        let orders = f.db.orders();
        let item = orders.add_item(order.id, f.dish_id, Some(" no salt ")).await.unwrap();
        assert_eq!(item.status, OrderItemStatus::Requested);
        assert_eq!(item.notes.as_deref(), Some("no salt"));

        let stored = orders.get_item(item.id).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn test_add_item_unknown_order_or_dish() {
        let f = fixture().await;
        let orders = f.db.orders();

        assert!(matches!(
            orders.add_item(404, f.dish_id, None).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        let order = f
            .db
            .lifecycle(TaxRate::zero())
            .create_order(f.table_id, f.waiter_id)
            .await
            .unwrap();
        assert!(matches!(
            orders.add_item(order.id, 404, None).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
        assert!(orders.list_items(order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_status_has_no_transition_graph() {
        let f = fixture().await;
        let order = f
            .db
            .lifecycle(TaxRate::zero())
            .create_order(f.table_id, f.waiter_id)
            .await
            .unwrap();
        let orders = f.db.orders();
        let item = orders.add_item(order.id, f.dish_id, None).await.unwrap();

        for status in [
            OrderItemStatus::Served,
            OrderItemStatus::Requested,
            OrderItemStatus::Ready,
            OrderItemStatus::InPreparation,
        ] {
            orders.set_item_status(item.id, status).await.unwrap();
            assert_eq!(orders.get_item(item.id).await.unwrap().unwrap().status, status);
        }

        assert!(matches!(
            orders.set_item_status(9999, OrderItemStatus::Ready).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_priced_items_follow_menu() {
        let f = fixture().await;
        let order = f
            .db
            .lifecycle(TaxRate::zero())
            .create_order(f.table_id, f.waiter_id)
            .await
            .unwrap();
        let orders = f.db.orders();
        orders.add_item(order.id, f.dish_id, None).await.unwrap();
        orders.add_item(order.id, f.dish_id, Some("well done")).await.unwrap();

        let priced = orders.list_priced_items(order.id).await.unwrap();
        assert_eq!(priced.len(), 2);
        assert!(priced.iter().all(|p| p.name == "Milanesa" && p.price == 3500.0));
    }
}
