//! # Service Error Type
//!
//! Unified error type for back office services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Back Office                        │
//! │                                                                         │
//! │  Service Function                                                      │
//! │  Result<T, ServiceError>                                               │
//! │         │                                                               │
//! │         ├── ValidationError ──► CoreError::Validation ──┐              │
//! │         ├── CoreError::InsufficientPayment ─────────────┤              │
//! │         ├── DbError::NotFound / QueryFailed ────────────┼─► ServiceError│
//! │         └── ConfigError ────────────────────────────────┘              │
//! │                                                                         │
//! │  Skipped reconciliation lines are NOT errors: they ride along in the   │
//! │  receipt's report and the order stays completed.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized as:
//! ```json
//! { "code": "INSUFFICIENT_PAYMENT", "message": "Insufficient payment: total is ₱60.00, tendered ₱50.00" }
//! ```

use serde::Serialize;
use kusina_core::CoreError;
use kusina_db::DbError;

use crate::state::ConfigError;

/// Error returned from back office services.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Tendered amount does not cover the total (402)
    InsufficientPayment,

    /// Resource not found (404)
    NotFound,

    /// The stored state moved since the caller read it (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Business rule rejected the operation (422)
    BusinessLogic,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::Domain(core) => ServiceError::from(core),
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            e @ DbError::StockConflict { .. } => ServiceError::new(ErrorCode::Conflict, e.to_string()),
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Decode { column, reason } => {
                tracing::error!(column = %column, "Stored value failed to decode: {}", reason);
                ServiceError::new(ErrorCode::DatabaseError, "Stored data is unreadable")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientPayment { .. } => {
                ServiceError::new(ErrorCode::InsufficientPayment, err.to_string())
            }
            CoreError::InvalidOrderStatus { .. } => {
                ServiceError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InventoryItemNotFound(id) => ServiceError::not_found("Inventory item", &id),
            CoreError::MenuItemNotFound(id) => ServiceError::not_found("Menu item", &id),
            CoreError::Validation(e) => ServiceError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}
