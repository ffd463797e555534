//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        CoreError / ValidationError         │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in CLI) ← Short operator-facing message                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failed multi-statement operation is rolled back before its error
//! is returned, so that operation leaves no partial writes. Work committed
//! earlier stays: a `MigrationFailed` keeps the migrations applied before
//! the failing version.

use comanda_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Unknown table id passed to `create_order`
    /// - Unknown order id passed to `close_and_settle`
    /// - `UPDATE` touched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Creating a second user with an existing username
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Adding an item to an order that does not exist
    /// - Adding a menu item id that does not exist
    /// - Reserving a table that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The record exists but is not in a state that allows the operation.
    ///
    /// ## When This Occurs
    /// - Closing an order that is already closed
    #[error("{entity} {id} is {state}, cannot {action}")]
    InvalidState {
        entity: String,
        id: String,
        state: String,
        action: String,
    },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration could not be applied.
    ///
    /// Fatal at startup. The failing migration was rolled back and the
    /// store is left at the previous version.
    #[error("Migration {version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Input rejected before reaching the store.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain rule failure (credentials, password hashing).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(
        entity: impl Into<String>,
        id: impl ToString,
        state: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        DbError::InvalidState {
            entity: entity.into(),
            id: id.to_string(),
            state: state.into(),
            action: action.into(),
        }
    }

    /// Whether repeating the same call later could succeed.
    ///
    /// Only contention and connection problems qualify. Nothing in this
    /// crate retries on its own.
    pub fn is_retry_safe(&self) -> bool {
        matches!(
            self,
            DbError::PoolExhausted | DbError::TransactionFailed(_) | DbError::ConnectionFailed(_)
        )
    }

    /// Whether this is a constraint violation reported by SQLite.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: users.username"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked") {
                    DbError::TransactionFailed(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DbError::not_found("Order", 42).to_string(),
            "Order not found: 42"
        );
        assert_eq!(
            DbError::invalid_state("Order", 7, "closed", "close").to_string(),
            "Order 7 is closed, cannot close"
        );
        assert_eq!(
            DbError::MigrationFailed {
                version: 2,
                reason: "no such table".to_string()
            }
            .to_string(),
            "Migration 2 failed: no such table"
        );
    }

    #[test]
    fn test_classification() {
        assert!(DbError::PoolExhausted.is_retry_safe());
        assert!(!DbError::not_found("Table", 1).is_retry_safe());
        assert!(DbError::duplicate("users.username", "admin").is_constraint_violation());
        assert!(!DbError::Internal("x".into()).is_constraint_violation());
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: DbError = CoreError::InvalidCredentials.into();
        assert_eq!(err.to_string(), "Invalid username or password");
    }
}
