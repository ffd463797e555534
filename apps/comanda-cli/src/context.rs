//! Process-wide state built once in `main` and handed to every command.

use comanda_db::{Database, DbConfig, DbResult, OrderLifecycle};
use tracing::info;

use crate::config::AppConfig;

/// Open database plus the configuration it was opened with.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub db: Database,
    pub config: AppConfig,
}

impl AppContext {
    /// Opens (and migrates) the configured database file.
    ///
    /// ## Returns
    /// * `Err(DbError::MigrationFailed)` - The store could not be brought
    ///   to the current schema; nothing else should run.
    pub async fn open(config: AppConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening database");
        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        Ok(AppContext { db, config })
    }

    /// Wraps an already opened database.
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppContext { db, config }
    }

    /// Order lifecycle using the configured tax rate.
    pub fn lifecycle(&self) -> OrderLifecycle<'_> {
        self.db.lifecycle(self.config.tax_rate())
    }
}
