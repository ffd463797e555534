//! # Domain Types
//!
//! Core domain records used throughout Comanda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiningTable    │◄──│     Order       │──►│      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  status         │   │  table_id       │   │  username (uq)  │       │
//! │  │  waiter_id      │   │  waiter_id      │   │  role           │       │
//! │  └────────▲────────┘   │  status         │   └─────────────────┘       │
//! │           │            └────────┬────────┘                              │
//! │           │                     │ owns                                  │
//! │  ┌────────┴────────┐   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │  Reservation    │   │   OrderItem     │──►│    MenuItem     │       │
//! │  │  (informational)│   │  status, notes  │   │  price, cost    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record is keyed by an `i64` assigned by the store on insert.
//! Tables are referenced by orders and reservations, never owned by them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Process-wide tax rate, stored as a fraction (`0.21` = 21%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(f64);

impl TaxRate {
    /// Creates a tax rate from a fraction (`0.21` for 21%).
    #[inline]
    pub const fn from_fraction(fraction: f64) -> Self {
        TaxRate(fraction)
    }

    /// Creates a tax rate from a percentage (`21.0` for 21%).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate(pct / 100.0)
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> f64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 * 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0.0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Users
// =============================================================================

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Waiter,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Waiter => "waiter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    /// PHC-format password hash. Never leaves the process.
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
}

// =============================================================================
// Menu
// =============================================================================

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Sale price. Always >= 0.
    pub price: f64,
    /// Cost of goods. Always >= 0.
    pub cost: f64,
    /// Units on hand. Independent of price and cost.
    pub stock: i64,
    /// Path or URL of a photo, if any.
    pub photo: Option<String>,
}

/// Fields for a menu item about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub stock: i64,
    pub photo: Option<String>,
}

// =============================================================================
// Tables
// =============================================================================

/// Occupancy of a dining table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Free,
    Occupied,
}

impl TableStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Free => "free",
            TableStatus::Occupied => "occupied",
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Free
    }
}

/// A dining table.
///
/// `status` and `waiter_id` are written only by the order lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub status: TableStatus,
    pub waiter_id: Option<i64>,
}

impl DiningTable {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    Closed,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

/// An order placed at a table by a waiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub waiter_id: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

// =============================================================================
// Order Items
// =============================================================================

/// Kitchen status of a single order line.
///
/// There is no transition graph: any value may follow any other,
/// including moving a served item back to requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    Requested,
    InPreparation,
    Ready,
    Served,
}

impl OrderItemStatus {
    pub const ALL: [OrderItemStatus; 4] = [
        OrderItemStatus::Requested,
        OrderItemStatus::InPreparation,
        OrderItemStatus::Ready,
        OrderItemStatus::Served,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderItemStatus::Requested => "requested",
            OrderItemStatus::InPreparation => "in_preparation",
            OrderItemStatus::Ready => "ready",
            OrderItemStatus::Served => "served",
        }
    }
}

impl Default for OrderItemStatus {
    fn default() -> Self {
        OrderItemStatus::Requested
    }
}

impl fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderItemStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderItemStatus::ALL
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect(),
            })
    }
}

/// A line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub status: OrderItemStatus,
    pub notes: Option<String>,
}

/// An order line joined with the current menu name and price.
///
/// This is the input of settlement: an item contributes its menu price
/// regardless of status or notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PricedOrderItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub price: f64,
    pub status: OrderItemStatus,
    pub notes: Option<String>,
}

// =============================================================================
// Reservations
// =============================================================================

/// A table reservation. Does not affect table or order status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: i64,
    pub table_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    /// Local wall-clock time of the booking.
    #[ts(as = "String")]
    pub reserved_at: NaiveDateTime,
    pub notes: Option<String>,
}

/// Fields for a reservation about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReservation {
    pub table_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[ts(as = "String")]
    pub reserved_at: NaiveDateTime,
    pub notes: Option<String>,
}

// =============================================================================
// Reports
// =============================================================================

/// One order in the daily sales report.
///
/// `gross_subtotal` is the plain sum of menu prices: no tax, tip or
/// discount. It is not the settlement total shown on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailySalesRow {
    pub order_id: i64,
    pub table_name: String,
    pub waiter_name: String,
    pub gross_subtotal: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(21.0);
        assert!((rate.fraction() - 0.21).abs() < 1e-12);
        assert!((rate.percentage() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_item_status_parse() {
        assert_eq!(
            "in_preparation".parse::<OrderItemStatus>().unwrap(),
            OrderItemStatus::InPreparation
        );
        assert_eq!(
            " SERVED ".parse::<OrderItemStatus>().unwrap(),
            OrderItemStatus::Served
        );
        assert!("cooking".parse::<OrderItemStatus>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderItemStatus::default(), OrderItemStatus::Requested);
        assert_eq!(OrderStatus::default(), OrderStatus::Open);
        assert_eq!(TableStatus::default(), TableStatus::Free);
    }

    #[test]
    fn test_user_serialization_hides_hash() {
        let user = User {
            id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
            password_hash: "$argon2id$secret".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
