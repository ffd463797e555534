//! # Repository Module
//!
//! Typed CRUD and list operations, one repository per record kind.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  CLI / OrderLifecycle                                                  │
//! │       │                                                                 │
//! │       │  db.tables().list()                                            │
//! │       ▼                                                                 │
//! │  ┌──────────────┬──────────────┬──────────────┬─────────────────────┐  │
//! │  │ UserRepo     │ MenuRepo     │ TableRepo    │ OrderRepo           │  │
//! │  │ Reservation  │ ReportRepo   │              │ (orders + items)    │  │
//! │  └──────────────┴──────────────┴──────────────┴─────────────────────┘  │
//! │       │                                                                 │
//! │       │  one statement, or a short transaction                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods taking `&self` run on the pool. Associated functions taking a
//! `&mut SqliteConnection` run inside a caller's transaction; the order
//! lifecycle composes those.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Staff accounts and login
//! - [`MenuRepository`](menu::MenuRepository) - Menu items
//! - [`TableRepository`](table::TableRepository) - Dining tables
//! - [`OrderRepository`](order::OrderRepository) - Orders and order items
//! - [`ReservationRepository`](reservation::ReservationRepository) - Bookings
//! - [`ReportRepository`](report::ReportRepository) - Daily sales aggregation

pub mod menu;
pub mod order;
pub mod report;
pub mod reservation;
pub mod table;
pub mod user;
