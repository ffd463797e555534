//! # Table Repository
//!
//! Dining tables.
//!
//! Occupancy is not writable through the public API. The transaction
//! helpers at the bottom of this file are used by the order lifecycle,
//! which flips `status` and `waiter_id` together with the order it
//! opens or closes.
//!
//! ```text
//!            create_order                 close_order
//!   free ─────────────────────► occupied ─────────────► free
//!   (waiter_id NULL)            (waiter_id = waiter)    (waiter_id NULL)
//! ```

use comanda_core::validation::validate_name;
use comanda_core::{DiningTable, TableStatus};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for dining tables.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Adds a free table.
    pub async fn create(&self, name: &str) -> DbResult<DiningTable> {
        let name = name.trim();
        validate_name("name", name)?;

        debug!(name = %name, "Creating table");

        let result = sqlx::query("INSERT INTO tables (name, status) VALUES (?1, ?2)")
            .bind(name)
            .bind(TableStatus::Free)
            .execute(&self.pool)
            .await?;

        Ok(DiningTable {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            status: TableStatus::Free,
            waiter_id: None,
        })
    }

    /// Gets a table by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<DiningTable>> {
        let table = sqlx::query_as::<_, DiningTable>(
            "SELECT id, name, status, waiter_id FROM tables WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Lists all tables ordered by id.
    pub async fn list(&self) -> DbResult<Vec<DiningTable>> {
        let tables = sqlx::query_as::<_, DiningTable>(
            "SELECT id, name, status, waiter_id FROM tables ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Number of tables.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tables")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Transaction helpers
    // =========================================================================

    /// Current status of a table, `None` if it doesn't exist.
    pub(crate) async fn status_in(
        conn: &mut SqliteConnection,
        table_id: i64,
    ) -> DbResult<Option<TableStatus>> {
        let status = sqlx::query_scalar::<_, TableStatus>("SELECT status FROM tables WHERE id = ?1")
            .bind(table_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(status)
    }

    /// Marks a table occupied by `waiter_id`.
    pub(crate) async fn occupy(
        conn: &mut SqliteConnection,
        table_id: i64,
        waiter_id: i64,
    ) -> DbResult<()> {
        debug!(table_id, waiter_id, "Occupying table");

        let result = sqlx::query("UPDATE tables SET status = ?1, waiter_id = ?2 WHERE id = ?3")
            .bind(TableStatus::Occupied)
            .bind(waiter_id)
            .bind(table_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", table_id));
        }

        Ok(())
    }

    /// Marks a table free and clears its waiter.
    pub(crate) async fn release(conn: &mut SqliteConnection, table_id: i64) -> DbResult<()> {
        debug!(table_id, "Releasing table");

        let result = sqlx::query("UPDATE tables SET status = ?1, waiter_id = NULL WHERE id = ?2")
            .bind(TableStatus::Free)
            .bind(table_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", table_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_new_tables_are_free_and_listed_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.tables();

        let patio = tables.create("Patio").await.unwrap();
        tables.create("Window").await.unwrap();

        let listed = tables.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, patio.id);
        assert!(listed.iter().all(|t| t.status == TableStatus::Free && t.waiter_id.is_none()));
    }

    #[tokio::test]
    async fn test_missing_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.tables().get_by_id(99).await.unwrap().is_none());

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(TableRepository::status_in(&mut *conn, 99).await.unwrap(), None);
        assert!(matches!(
            TableRepository::release(&mut *conn, 99).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
