//! # CLI Error Type
//!
//! Single error type returned by every command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Comanda                                │
//! │                                                                         │
//! │  Command handler                                                        │
//! │  Result<Value, ApiError>                                                │
//! │         │                                                               │
//! │         ├── DbError::NotFound ──────────────► NOT_FOUND                 │
//! │         ├── DbError::InvalidState ──────────► BUSINESS_LOGIC            │
//! │         ├── ValidationError / FK / UNIQUE ──► VALIDATION_ERROR          │
//! │         ├── CoreError::InvalidCredentials ──► UNAUTHORIZED              │
//! │         ├── ConfigError ────────────────────► CONFIG_ERROR              │
//! │         └── sqlx / io failures ─────────────► DATABASE_ERROR / INTERNAL │
//! │                                                  (details logged only)  │
//! │                                                                         │
//! │  main prints `[CODE] message` to stderr and exits non-zero.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use comanda_core::CoreError;
use comanda_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error shown to the operator when a command fails.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Order not found: 42" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown table, order, item, ...
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Wrong username or password
    Unauthorized,

    /// The record is in the wrong state for the operation
    BusinessLogic,

    /// Database operation failed
    DatabaseError,

    /// Bad configuration value
    ConfigError,

    /// Anything else (file output, serialization)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference: table, order, waiter or dish does not exist")
            }
            DbError::InvalidState {
                entity,
                id,
                state,
                action,
            } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("{} {} is {}, cannot {}", entity, id, state, action),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed { version, reason } => {
                tracing::error!(version, "Migration failed: {}", reason);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database migration {} failed", version),
                )
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    "Database transaction failed, nothing was changed",
                )
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::Core(e) => e.into(),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::Unauthorized, "Invalid username or password")
            }
            CoreError::PasswordHash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Could not process password")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("File output failed: {}", err);
        ApiError::internal(format!("Could not write output file: {}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Could not encode output: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self.code));
        write!(f, "[{}] {}", code, self.message)
    }
}

impl std::error::Error for ApiError {}
