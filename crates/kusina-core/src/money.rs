//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sizzler at ₱189.90 × 3 with 12% VAT drifts by a centavo             │
//! │  depending on where rounding happens.                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    18990 × 3 = 56970 centavos, VAT rounded exactly once                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kusina_core::money::Money;
//!
//! let price = Money::from_cents(18990); // ₱189.90
//! let line = price * 3_i64;              // ₱569.70
//! assert_eq!(line.cents(), 56970);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 peso).
///
/// ## Where Money Flows
/// ```text
/// MenuItem.price_cents ──► OrderLine.unit_price ──► line total
///                                                      │
///                     Σ vatable lines ──► VAT ─────────┤
///                                                      ▼
///                               Settlement.total ──► change
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use kusina_core::money::Money;
    ///
    /// let price = Money::from_cents(9900); // ₱99.00
    /// assert_eq!(price.cents(), 9900);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from pesos and centavos.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -₱5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount, rounding half up to the centavo.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use kusina_core::money::Money;
    /// use kusina_core::types::TaxRate;
    ///
    /// let vatable = Money::from_cents(20000); // ₱200.00
    /// let vat = vatable.calculate_tax(TaxRate::from_bps(1200));
    /// assert_eq!(vat.cents(), 2400); // ₱24.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large daily totals from overflowing
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Divides evenly across `parts`, rounding half up to the centavo.
    ///
    /// Used to derive a unit cost from a restock's total cost.
    /// Returns `None` when `parts` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use kusina_core::money::Money;
    ///
    /// // ₱100.00 for 3 packs → ₱33.33 each
    /// assert_eq!(Money::from_cents(10000).split_evenly(3), Some(Money::from_cents(3333)));
    /// // ₱0.05 for 2 → ₱0.03 (half up)
    /// assert_eq!(Money::from_cents(5).split_evenly(2), Some(Money::from_cents(3)));
    /// ```
    pub fn split_evenly(&self, parts: i64) -> Option<Money> {
        if parts <= 0 {
            return None;
        }
        let num = self.0 as i128 * 2 + parts as i128;
        let den = parts as i128 * 2;
        Some(Money::from_cents(num.div_euclid(den) as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable peso amount, e.g. `₱189.90`.
///
/// This is for logs and receipts in the back office only; dashboard
/// clients format centavos themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(18990);
        assert_eq!(money.cents(), 18990);
        assert_eq!(money.pesos(), 189);
        assert_eq!(money.cents_part(), 90);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(57, 70).cents(), 5770);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(18990).to_string(), "₱189.90");
        assert_eq!(Money::from_cents(500).to_string(), "₱5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-₱5.50");
        assert_eq!(Money::zero().to_string(), "₱0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);
        assert_eq!(vec![a, b, b].into_iter().sum::<Money>().cents(), 2000);
    }

    #[test]
    fn test_vat_rounding() {
        // ₱99.99 at 12% = ₱11.9988 → ₱12.00
        let vat = Money::from_cents(9999).calculate_tax(TaxRate::from_bps(1200));
        assert_eq!(vat.cents(), 1200);

        // ₱0.04 at 12% = ₱0.0048 → ₱0.00
        let vat = Money::from_cents(4).calculate_tax(TaxRate::from_bps(1200));
        assert_eq!(vat.cents(), 0);
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(
            Money::from_cents(18990).checked_mul(3),
            Some(Money::from_cents(56970))
        );
    }

    #[test]
    fn test_split_evenly() {
        assert_eq!(Money::from_cents(10000).split_evenly(4), Some(Money::from_cents(2500)));
        assert_eq!(Money::from_cents(10000).split_evenly(3), Some(Money::from_cents(3333)));
        assert_eq!(Money::from_cents(200).split_evenly(3), Some(Money::from_cents(67)));
        assert_eq!(Money::zero().split_evenly(5), Some(Money::zero()));
        assert_eq!(Money::from_cents(100).split_evenly(0), None);
    }
}
