//! # Error Types
//!
//! Domain-specific error types for kusina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kusina-core errors (this file)                                        │
//! │  ├── CoreError        - Settlement / lifecycle failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kusina-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Back office (app)                                                     │
//! │  └── ServiceError     - What callers see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reconciliation never raises an error for a missing inventory reference.
//! Those lines land in [`crate::reconcile::ReconciliationReport::skipped`]
//! instead, so the order they belong to stays completed.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Amount tendered does not cover the order total.
    ///
    /// ## When This Occurs
    /// ```text
    /// Order total: ₱60.00
    /// Tendered:    ₱50.00
    ///      │
    ///      ▼
    /// InsufficientPayment { required: 6000, tendered: 5000 }
    ///      │
    ///      ▼
    /// Nothing is persisted, cashier asks for more cash
    /// ```
    #[error("Insufficient payment: total is {required}, tendered {tendered}")]
    InsufficientPayment { required: Money, tendered: Money },

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Reconciling inventory for an order that never completed
    #[error("Order {order_number} is {status}, cannot perform operation")]
    InvalidOrderStatus {
        order_number: String,
        status: String,
    },

    /// Inventory record cannot be found.
    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// Menu item cannot be found.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any mutation so a rejected request leaves no trace.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, unknown category).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::MustBePositive`].
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_payment_message() {
        let err = CoreError::InsufficientPayment {
            required: Money::from_cents(6000),
            tendered: Money::from_cents(5000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total is ₱60.00, tendered ₱50.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("items");
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::must_be_positive("quantity");
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
