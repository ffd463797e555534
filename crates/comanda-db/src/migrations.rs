//! # Database Migrations
//!
//! Ordered, versioned schema migrations with a persisted ledger.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CREATE TABLE IF NOT EXISTS schema_version (outside any transaction)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  current = COALESCE(MAX(version), 0)                                   │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql   ✓ (version <= current, skipped)     │
//! │       └── 002_listing_indexes.sql  ⬜ (version > current)               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │        BEGIN ─► script ─► INSERT schema_version ─► COMMIT               │
//! │                 │                                                       │
//! │                 └── any failure ─► ROLLBACK ─► MigrationFailed (fatal) │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create `migrations/NNN_description.sql` with the next version number
//! 2. Append it to [`MIGRATIONS`]
//! 3. **NEVER** modify existing migrations - always add new ones
//!
//! Versions only need to increase. A gap (1, 2, 5) is fine; a migration
//! numbered below the store's current version is never applied.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};

// =============================================================================
// Migration List
// =============================================================================

/// One versioned change script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub const fn new(version: i64, description: &'static str, sql: &'static str) -> Self {
        Migration {
            version,
            description,
            sql,
        }
    }
}

/// Migrations embedded from the `migrations/` directory, in version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration::new(
        1,
        "initial schema",
        include_str!("../migrations/001_initial_schema.sql"),
    ),
    Migration::new(
        2,
        "listing indexes",
        include_str!("../migrations/002_listing_indexes.sql"),
    ),
];

/// Highest version in [`MIGRATIONS`].
pub fn latest_version() -> i64 {
    MIGRATIONS.iter().map(|m| m.version).max().unwrap_or(0)
}

// =============================================================================
// Report
// =============================================================================

/// Outcome of one migrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Store version before the run.
    pub from_version: i64,
    /// Store version after the run.
    pub to_version: i64,
    /// Versions applied by this run, ascending. Empty when up to date.
    pub applied: Vec<i64>,
}

impl MigrationReport {
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

// =============================================================================
// Schema Migrator
// =============================================================================

/// Applies a list of migrations to a store.
///
/// ## Usage
/// ```rust,ignore
/// let report = SchemaMigrator::builtin().run(db.pool()).await?;
/// assert_eq!(report.to_version, latest_version());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaMigrator {
    migrations: Vec<Migration>,
}

impl SchemaMigrator {
    /// Creates a migrator over an arbitrary list. The list is applied in
    /// ascending version order whatever order it is given in.
    pub fn new(migrations: impl Into<Vec<Migration>>) -> Self {
        let mut migrations = migrations.into();
        migrations.sort_by_key(|m| m.version);
        SchemaMigrator { migrations }
    }

    /// Migrator over the embedded [`MIGRATIONS`].
    pub fn builtin() -> Self {
        SchemaMigrator::new(MIGRATIONS.to_vec())
    }

    /// Number of migrations this migrator knows about.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Brings the store up to the highest known version.
    ///
    /// Each pending migration runs in its own transaction together with
    /// its ledger row. The first failure is rolled back and aborts the
    /// run; migrations committed before it stay applied.
    pub async fn run(&self, pool: &SqlitePool) -> DbResult<MigrationReport> {
        ensure_ledger(pool).await?;

        let from_version = current_version(pool).await?;
        let mut report = MigrationReport {
            from_version,
            to_version: from_version,
            applied: Vec::new(),
        };

        for migration in self.migrations.iter().filter(|m| m.version > from_version) {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            if let Err(reason) = apply(pool, migration).await {
                error!(version = migration.version, %reason, "Migration rolled back");
                return Err(DbError::MigrationFailed {
                    version: migration.version,
                    reason,
                });
            }

            report.applied.push(migration.version);
            report.to_version = migration.version;
        }

        if report.is_noop() {
            debug!(version = from_version, "Schema up to date");
        } else {
            info!(
                from = report.from_version,
                to = report.to_version,
                applied = report.applied.len(),
                "Migrations complete"
            );
        }

        Ok(report)
    }
}

/// Runs one migration and its ledger insert in a single transaction.
async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), String> {
    let mut tx = pool.begin().await.map_err(|e| e.to_string())?;

    let outcome = async {
        sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)")
            .bind(migration.version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        Ok::<(), sqlx::Error>(())
    }
    .await;

    match outcome {
        Ok(()) => tx.commit().await.map_err(|e| e.to_string()),
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
            Err(e.to_string())
        }
    }
}

// =============================================================================
// Ledger Helpers
// =============================================================================

async fn ensure_ledger(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT    NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Runs the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<MigrationReport> {
    SchemaMigrator::builtin().run(pool).await
}

/// Highest applied version, 0 for a fresh store.
pub async fn current_version(pool: &SqlitePool) -> DbResult<i64> {
    ensure_ledger(pool).await?;

    let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok(version)
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (known_migrations, applied_migrations)
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    ensure_ledger(pool).await?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATIONS.len(), applied as usize))
}

// =============================================================================
// Unit Tests
// =============================================================================
