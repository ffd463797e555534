//! # Menu Repository
//!
//! Database operations for menu items.

use comanda_core::validation::{validate_amount, validate_name, validate_stock};
use comanda_core::{MenuItem, NewMenuItem};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for menu items.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Inserts a menu item.
    ///
    /// ## Rules
    /// - name and category must not be blank
    /// - price and cost must be finite and >= 0
    /// - stock must be >= 0
    pub async fn create(&self, item: &NewMenuItem) -> DbResult<MenuItem> {
        validate_name("name", &item.name)?;
        validate_name("category", &item.category)?;
        validate_amount("price", item.price)?;
        validate_amount("cost", item.cost)?;
        validate_stock(item.stock)?;

        let name = item.name.trim();
        let category = item.category.trim();

        debug!(name = %name, category = %category, price = item.price, "Inserting menu item");

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (name, category, price, cost, stock, photo)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(item.price)
        .bind(item.cost)
        .bind(item.stock)
        .bind(&item.photo)
        .execute(&self.pool)
        .await?;

        Ok(MenuItem {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            category: category.to_string(),
            price: item.price,
            cost: item.cost,
            stock: item.stock,
            photo: item.photo.clone(),
        })
    }

    /// Gets a menu item by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, category, price, cost, stock, photo
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the menu grouped by category, then by name.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, category, price, cost, stock, photo
            FROM menu_items
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Number of menu items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
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
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn dish(name: &str, category: &str, price: f64) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            category: category.to_string(),
            price,
            cost: price / 2.0,
            stock: 10,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_list_ordered_by_category_then_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let menu = db.menu();

        menu.create(&dish("Soup", "Starter", 1800.0)).await.unwrap();
        menu.create(&dish("Salad", "Starter", 2100.0)).await.unwrap();
        menu.create(&dish("Coffee", "Drink", 900.0)).await.unwrap();

        let names: Vec<String> = menu.list().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Coffee", "Salad", "Soup"]);
    }

    #[tokio::test]
    async fn test_create_round_trips_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut new_item = dish("Flan", "Dessert", 1500.0);
        new_item.photo = Some("img/flan.png".to_string());

        let created = db.menu().create(&new_item).await.unwrap();
        let fetched = db.menu().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.menu().create(&dish("Bad", "Main", -1.0)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.menu().count().await.unwrap(), 0);
    }
}
