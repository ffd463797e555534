//! # comanda-db: Database Layer for Comanda
//!
//! SQLite persistence and the transactional order engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Data Flow                                │
//! │                                                                         │
//! │  comanda CLI (open-order, add-item, settle ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     comanda-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ OrderLifecycle│───►│  Repositories │    │  Migrations  │   │   │
//! │  │   │ (lifecycle.rs)│    │ users, menu,  │    │ schema_      │   │   │
//! │  │   │               │    │ tables, orders│    │ version      │   │   │
//! │  │   └───────┬───────┘    │ reservations, │    │ ledger       │   │   │
//! │  │           │            │ reports       │    └──────────────┘   │   │
//! │  │           ▼            └───────┬───────┘                       │   │
//! │  │   comanda-core::settle         │                               │   │
//! │  │                                ▼                               │   │
//! │  │                     Database (pool.rs)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (restaurant.db)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Versioned schema migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`lifecycle`] - Order/table state transitions
//! - [`seed`] - Baseline data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comanda_core::TaxRate;
//! use comanda_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("restaurant.db")).await?;
//! db.seed_baseline().await?;
//!
//! let lifecycle = db.lifecycle(TaxRate::from_fraction(0.21));
//! let order = lifecycle.create_order(1, 2).await?;
//! lifecycle.add_item(order.id, 1, None).await?;
//! let settlement = lifecycle.close_and_settle(order.id, 0.1, 0.0).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lifecycle::OrderLifecycle;
pub use migrations::{Migration, MigrationReport, SchemaMigrator};
pub use pool::{Database, DbConfig};
pub use seed::SeedReport;

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::order::OrderRepository;
pub use repository::report::ReportRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::table::TableRepository;
pub use repository::user::UserRepository;
