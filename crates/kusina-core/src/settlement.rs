//! # Order Settlement
//!
//! Computes subtotal, VAT, total and change for a set of order lines and a
//! payment, rejecting anything that cannot be settled before a single
//! record is touched.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines + payment                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate lines ── empty? qty ≤ 0? price ≤ 0? ──► ValidationError      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal = Σ price × qty          (subtotal ≤ 0 ──► ValidationError)   │
//! │  vatable  = Σ over vatable lines                                        │
//! │  tax      = round(vatable × 12%)                                        │
//! │  total    = subtotal + tax                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  paid < total ───────────────────────────► InsufficientPayment         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  change = paid - total                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Settlement is deterministic: identical inputs always yield identical
//! output, and nothing here depends on the clock.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{OrderLine, PaymentMethod, TaxRate};
use crate::validation::{validate_order_size, validate_price_cents, validate_quantity};

/// Payment as keyed in at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub amount_paid_cents: i64,
}

impl PaymentInput {
    pub fn cash(amount_paid_cents: i64) -> Self {
        PaymentInput {
            method: PaymentMethod::Cash,
            amount_paid_cents,
        }
    }

    pub fn gcash(amount_paid_cents: i64) -> Self {
        PaymentInput {
            method: PaymentMethod::Gcash,
            amount_paid_cents,
        }
    }

    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }
}

/// Result of a successful settlement.
///
/// Invariants: `total == subtotal + tax`, `change == amount_paid - total`,
/// `change >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub subtotal: Money,
    /// Portion of the subtotal VAT was charged on.
    pub vatable_subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub change: Money,
    pub method: PaymentMethod,
}

// =============================================================================
// Calculator
// =============================================================================

/// Settles orders at a fixed VAT rate.
///
/// ## Example
/// ```rust
/// use kusina_core::settlement::{PaymentInput, SettlementCalculator};
/// use kusina_core::types::OrderLine;
///
/// let calc = SettlementCalculator::default(); // 12% VAT
/// let lines = vec![OrderLine::new("Chicken Adobo", 10000, 2)];
///
/// let s = calc.settle(&lines, &PaymentInput::cash(25000)).unwrap();
/// assert_eq!(s.subtotal.cents(), 20000);
/// assert_eq!(s.tax.cents(), 2400);
/// assert_eq!(s.total.cents(), 22400);
/// assert_eq!(s.change.cents(), 2600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementCalculator {
    vat_rate: TaxRate,
}

impl Default for SettlementCalculator {
    fn default() -> Self {
        SettlementCalculator::new(TaxRate::default())
    }
}

impl SettlementCalculator {
    pub fn new(vat_rate: TaxRate) -> Self {
        SettlementCalculator { vat_rate }
    }

    pub fn vat_rate(&self) -> TaxRate {
        self.vat_rate
    }

    /// Settles `lines` against `payment`.
    ///
    /// Every check runs before any arithmetic result is returned, so a
    /// failure here means the caller has nothing to roll back.
    pub fn settle(&self, lines: &[OrderLine], payment: &PaymentInput) -> CoreResult<Settlement> {
        validate_order_size(lines.len())?;

        for line in lines {
            validate_quantity(line.quantity)?;
            if line.unit_price_cents <= 0 {
                return Err(ValidationError::must_be_positive("unit price").into());
            }
            validate_price_cents(line.unit_price_cents)?;
        }

        let subtotal = checked_total(lines.iter(), "subtotal")?;
        if !subtotal.is_positive() {
            return Err(ValidationError::must_be_positive("subtotal").into());
        }

        let vatable_subtotal = checked_total(lines.iter().filter(|l| l.vatable), "subtotal")?;
        let tax = vatable_subtotal.calculate_tax(self.vat_rate);
        let total = subtotal
            .checked_add(tax)
            .ok_or_else(|| out_of_range("total"))?;

        let amount_paid = payment.amount_paid();
        if amount_paid.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "amount paid".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        if amount_paid < total {
            return Err(CoreError::InsufficientPayment {
                required: total,
                tendered: amount_paid,
            });
        }

        Ok(Settlement {
            subtotal,
            vatable_subtotal,
            tax,
            total,
            amount_paid,
            change: amount_paid - total,
            method: payment.method,
        })
    }
}

/// Σ line totals, failing instead of wrapping.
fn checked_total<'a>(mut lines: impl Iterator<Item = &'a OrderLine>, field: &str) -> CoreResult<Money> {
    lines.try_fold(Money::zero(), |acc, line| {
        line.unit_price()
            .checked_mul(line.quantity)
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or_else(|| out_of_range(field))
    })
}

fn out_of_range(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// Settles at the default 12% VAT.
pub fn settle(lines: &[OrderLine], payment: &PaymentInput) -> CoreResult<Settlement> {
    SettlementCalculator::default().settle(lines, payment)
}

// =============================================================================
// Unit Tests
// =============================================================================
