//! # Validation Module
//!
//! Input validation for Comanda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (argument parsing)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories / OrderLifecycle (Rust)                         │
//! │  └── THIS MODULE: names, amounts, rates, notes                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (users.username)                                           │
//! │  └── Foreign keys (order_items → orders, menu_items ...)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comanda_core::validation::{validate_name, validate_amount};
//!
//! validate_name("name", "Milanesa").unwrap();
//! validate_amount("price", 3500.0).unwrap();
//! assert!(validate_amount("price", -1.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_NOTES_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name for users, tables, menu items and customers.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (username, table, dish, customer).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Normalizes optional free text.
///
/// Blank input becomes `None`; longer than [`MAX_NOTES_LEN`] is rejected.
///
/// ```rust
/// use comanda_core::validation::normalize_notes;
///
/// assert_eq!(normalize_notes(Some("  ")).unwrap(), None);
/// assert_eq!(
///     normalize_notes(Some(" no salt ")).unwrap(),
///     Some("no salt".to_string())
/// );
/// ```
pub fn normalize_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount or rate.
///
/// ## Rules
/// - Must be finite (no NaN, no infinity)
/// - Must be >= 0 (zero is allowed: free items, no tip, no discount)
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a stock count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
