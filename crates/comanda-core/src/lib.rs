//! # comanda-core: Pure Business Logic for Comanda
//!
//! Domain types and deterministic calculations for the restaurant engine,
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 comanda CLI / UI collaborator                   │   │
//! │  │    open-order ──► add-item ──► set-item-status ──► settle       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               comanda-db: OrderLifecycle + repositories         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │   totals   │  │ validation │  │   auth   │  │   │
//! │  │   │ Order     │  │ Settlement │  │   rules    │  │  argon2  │  │   │
//! │  │   │ Table ... │  │ TaxRate    │  │   checks   │  │  hashes  │  │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (User, MenuItem, DiningTable, Order, ...)
//! - [`totals`] - Settlement calculator (subtotal, tax, tip, total)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`auth`] - Password hashing and the authenticated identity
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::totals::{settle, SettlementRequest};
//! use comanda_core::types::TaxRate;
//!
//! let prices = [3500.0, 3500.0];
//! let request = SettlementRequest::new(0.1, 0.0);
//! let settlement = settle(&prices, TaxRate::from_fraction(0.21), request);
//!
//! assert_eq!(settlement.subtotal, 7000.0);
//! assert_eq!(settlement.total, 9170.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::AuthenticatedUser;
pub use error::{CoreError, CoreResult, ValidationError};
pub use totals::{settle, Settlement, SettlementRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate used when configuration does not provide one (21% VAT).
pub const DEFAULT_TAX_RATE: f64 = 0.21;

/// Longest accepted free-text note on an order item or reservation.
pub const MAX_NOTES_LEN: usize = 500;
