//! # Settlement Totals
//!
//! Turns the menu prices of an order's items into the figures printed on
//! the receipt.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Settlement Calculation                             │
//! │                                                                         │
//! │  item prices ──► subtotal = p1 + p2 + ... + pn                          │
//! │                      │                                                  │
//! │                      ├──► tax = subtotal * tax_rate   (process config)  │
//! │                      │                                                  │
//! │                      └──► tip = subtotal * tip_rate   (per call)        │
//! │                                                                         │
//! │  total = subtotal - discount + tax + tip                                │
//! │          (evaluated left to right, f64, no rounding)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are plain `f64`. Rounding is left to whoever prints them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::TaxRate;
use crate::validation::{validate_amount, ValidationResult};

// =============================================================================
// Request
// =============================================================================

/// Per-call settlement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettlementRequest {
    /// Tip as a fraction of the subtotal (`0.1` = 10%).
    pub tip_rate: f64,
    /// Flat amount taken off the total.
    pub discount: f64,
}

impl SettlementRequest {
    pub const fn new(tip_rate: f64, discount: f64) -> Self {
        SettlementRequest { tip_rate, discount }
    }

    /// Rejects NaN, infinite and negative inputs.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_amount("tip_rate", self.tip_rate)?;
        validate_amount("discount", self.discount)?;
        Ok(())
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Computed totals for one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub discount: f64,
    pub total: f64,
}

/// Computes the settlement of an order from its item prices.
///
/// Every item counts once at its price, whatever its kitchen status.
/// Inputs are not validated here; see [`SettlementRequest::validate`].
///
/// ## Example
/// ```rust
/// use comanda_core::totals::{settle, SettlementRequest};
/// use comanda_core::types::TaxRate;
///
/// let s = settle(&[], TaxRate::from_fraction(0.21), SettlementRequest::new(0.1, 0.0));
/// assert_eq!(s.subtotal, 0.0);
/// assert_eq!(s.total, 0.0);
/// ```
pub fn settle(prices: &[f64], tax_rate: TaxRate, request: SettlementRequest) -> Settlement {
    let subtotal = prices.iter().fold(0.0_f64, |acc, price| acc + price);
    let tax = subtotal * tax_rate.fraction();
    let tip = subtotal * request.tip_rate;
    let total = subtotal - request.discount + tax + tip;

    Settlement {
        subtotal,
        tax,
        tip,
        discount: request.discount,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_dishes_with_tip() {
        let s = settle(
            &[3500.0, 3500.0],
            TaxRate::from_fraction(0.21),
            SettlementRequest::new(0.1, 0.0),
        );
        assert_eq!(s.subtotal, 7000.0);
        assert_eq!(s.tax, 1470.0);
        assert_eq!(s.tip, 700.0);
        assert_eq!(s.total, 9170.0);
    }

    #[test]
    fn test_discount_subtracted() {
        let s = settle(
            &[1000.0],
            TaxRate::zero(),
            SettlementRequest::new(0.0, 250.0),
        );
        assert_eq!(s.total, 750.0);
        assert_eq!(s.discount, 250.0);
    }

    #[test]
    fn test_discount_may_exceed_subtotal() {
        let s = settle(&[100.0], TaxRate::zero(), SettlementRequest::new(0.0, 300.0));
        assert_eq!(s.total, -200.0);
    }

    #[test]
    fn test_request_validation() {
        assert!(SettlementRequest::new(0.1, 0.0).validate().is_ok());
        assert!(SettlementRequest::new(-0.1, 0.0).validate().is_err());
        assert!(SettlementRequest::new(0.1, f64::NAN).validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_total_matches_formula(
            prices in proptest::collection::vec(0.0f64..100_000.0, 0..20),
            rate in 0.0f64..1.0,
            tip_rate in 0.0f64..0.5,
            discount in 0.0f64..1_000.0,
        ) {
            let s = settle(
                &prices,
                TaxRate::from_fraction(rate),
                SettlementRequest::new(tip_rate, discount),
            );

            let mut subtotal = 0.0_f64;
            for p in &prices {
                subtotal += p;
            }
            prop_assert_eq!(s.subtotal, subtotal);
            prop_assert_eq!(s.tax, subtotal * rate);
            prop_assert_eq!(s.total, subtotal - discount + subtotal * rate + subtotal * tip_rate);
        }

        #[test]
        fn prop_settle_is_deterministic(
            prices in proptest::collection::vec(0.0f64..10_000.0, 0..10),
        ) {
            let request = SettlementRequest::new(0.1, 0.0);
            let rate = TaxRate::from_fraction(0.21);
            prop_assert_eq!(settle(&prices, rate, request), settle(&prices, rate, request));
        }
    }
}
