//! # Database Errors
//!
//! ```text
//! sqlx::Error ──┐
//! CoreError ────┼──► DbError ──► ServiceError (back office)
//! CAS miss ─────┘
//! ```

use kusina_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this ID, or the inventory record is retired.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate inventory name or order number.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A menu item or history row names an inventory record that is not
    /// stored.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Opening the pool failed, it timed out handing out a connection, or it
    /// was already closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement, including CHECK constraints and the
    /// history immutability triggers.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A transaction could not begin or commit, or a compare-and-set write
    /// kept losing to concurrent writers.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A counted stock correction was made against a count that is no longer
    /// the stored one.
    #[error("Stock for {id} changed: expected {expected}, found {actual}")]
    StockConflict { id: String, expected: i64, actual: i64 },

    /// A stored column, or one of the daily stats JSON blobs, did not decode.
    #[error("Failed to decode {column}: {reason}")]
    Decode { column: String, reason: String },

    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Any other sqlx failure.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn stock_conflict(id: impl Into<String>, expected: i64, actual: i64) -> Self {
        DbError::StockConflict {
            id: id.into(),
            expected,
            actual,
        }
    }

    pub fn decode(column: impl Into<String>, reason: impl ToString) -> Self {
        DbError::Decode {
            column: column.into(),
            reason: reason.to_string(),
        }
    }
}

/// ```text
/// RowNotFound                   → NotFound
/// Database (UNIQUE / FK / other) → UniqueViolation / ForeignKeyViolation / QueryFailed
/// PoolTimedOut, PoolClosed      → ConnectionFailed
/// ColumnDecode                  → Decode
/// anything else                 → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionFailed("timed out waiting for a connection".to_string())
            }

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { index, source } => DbError::Decode {
                column: index,
                reason: source.to_string(),
            },

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::decode("json", err)
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
