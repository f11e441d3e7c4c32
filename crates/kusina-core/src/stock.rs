//! # Stock Status Classifier
//!
//! Maps `(current_stock, min_stock)` to the status label shown on the
//! inventory screens and counted by the dashboard gauges.
//!
//! ## Thresholds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  min_stock = 10                                                         │
//! │                                                                         │
//! │  stock:  0 │ 1  2  3 │ 4  5  6  7 │ 8  9  10  11 ...                   │
//! │         ───┼─────────┼────────────┼────────────────                     │
//! │         out│critical │    low     │  sufficient                         │
//! │            │ ≤ 30%   │   ≤ 70%    │                                     │
//! │                                                                         │
//! │  First match wins, evaluated top to bottom:                            │
//! │    1. stock == 0               → out                                   │
//! │    2. stock ≤ min × 0.30       → critical                              │
//! │    3. stock ≤ min × 0.70       → low                                   │
//! │    4. otherwise                → sufficient                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ratios are held in basis points and compared with integer
//! cross-multiplication, so `3 ≤ 10 × 0.3` is exact and never suffers
//! from `0.3` not being representable in binary floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Upper bound (inclusive) of the critical band, in basis points of min stock.
pub const CRITICAL_THRESHOLD_BPS: i64 = 3000;

/// Upper bound (inclusive) of the low band, in basis points of min stock.
pub const LOW_THRESHOLD_BPS: i64 = 7000;

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock level of an inventory record.
///
/// Variants are declared from most to least severe; [`StockStatus::severity`]
/// exposes that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Nothing left on hand.
    Out,
    /// At or below 30% of the reorder threshold.
    Critical,
    /// At or below 70% of the reorder threshold.
    Low,
    /// Comfortably above the reorder threshold bands.
    Sufficient,
}

impl StockStatus {
    /// Severity rank: 3 for `Out` down to 0 for `Sufficient`.
    pub const fn severity(&self) -> u8 {
        match self {
            StockStatus::Out => 3,
            StockStatus::Critical => 2,
            StockStatus::Low => 1,
            StockStatus::Sufficient => 0,
        }
    }

    /// True for the statuses the dashboard counts as "low stock".
    ///
    /// The dashboard's low-stock gauge has always included critical items.
    pub const fn needs_reorder(&self) -> bool {
        matches!(self, StockStatus::Low | StockStatus::Critical)
    }

    /// Wire/database form of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Out => "out",
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Sufficient => "sufficient",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out" => Ok(StockStatus::Out),
            "critical" => Ok(StockStatus::Critical),
            "low" => Ok(StockStatus::Low),
            "sufficient" => Ok(StockStatus::Sufficient),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec![
                    "out".to_string(),
                    "critical".to_string(),
                    "low".to_string(),
                    "sufficient".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies a stock level against its reorder threshold.
///
/// Negative stock is treated as `Out`; callers clamp before storing, but
/// the classifier stays total over its input domain.
///
/// ## Example
/// ```rust
/// use kusina_core::stock::{classify, StockStatus};
///
/// assert_eq!(classify(3, 10), StockStatus::Critical); // 3 ≤ 10 × 0.3
/// assert_eq!(classify(7, 10), StockStatus::Low);      // 7 ≤ 10 × 0.7
/// ```
pub fn classify(current_stock: i64, min_stock: i64) -> StockStatus {
    if current_stock <= 0 {
        return StockStatus::Out;
    }

    let scaled = current_stock as i128 * 10_000;
    let min = min_stock as i128;

    if scaled <= min * CRITICAL_THRESHOLD_BPS as i128 {
        StockStatus::Critical
    } else if scaled <= min * LOW_THRESHOLD_BPS as i128 {
        StockStatus::Low
    } else {
        StockStatus::Sufficient
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
