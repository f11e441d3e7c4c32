//! # kusina-core: Pure Business Logic for the Kusina Back Office
//!
//! This crate holds the outlet's domain rules as pure functions with zero
//! I/O dependencies: stock classification, order settlement, inventory
//! reconciliation and the daily statistics fold.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kusina Back Office Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              apps/backoffice (checkout, restock, dashboard)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kusina-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌────────────┐ ┌───────────┐ ┌───────────────┐  │   │
//! │  │   │  stock   │ │ settlement │ │ reconcile │ │     stats     │  │   │
//! │  │   │ classify │ │   settle   │ │ apply_sale│ │ DailyStats    │  │   │
//! │  │   │          │ │   VAT 12%  │ │ restock   │ │ Aggregator    │  │   │
//! │  │   └──────────┘ └────────────┘ └───────────┘ └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                   │                   │
//! │  ┌──────────────▼──────────────┐    ┌───────────────▼───────────────┐  │
//! │  │  kusina-db (SQLite)         │    │  kusina-notify (push channel) │  │
//! │  └─────────────────────────────┘    └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryRecord, MenuItem, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stock`] - Stock status classifier
//! - [`settlement`] - Order settlement calculator
//! - [`reconcile`] - Inventory reconciliation and restocking
//! - [`stats`] - Daily statistics aggregator and dashboard summary
//! - [`events`] - Domain events emitted to dashboard observers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kusina_core::stock::{classify, StockStatus};
//!
//! assert_eq!(classify(0, 10), StockStatus::Out);
//! assert_eq!(classify(3, 10), StockStatus::Critical);
//! assert_eq!(classify(7, 10), StockStatus::Low);
//! assert_eq!(classify(8, 10), StockStatus::Sufficient);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod money;
pub mod reconcile;
pub mod settlement;
pub mod stats;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{DomainEvent, StockChangeReason};
pub use money::Money;
pub use reconcile::{ReconciliationReport, SkipReason, SkippedLine, StockAdjustment};
pub use settlement::{PaymentInput, Settlement, SettlementCalculator};
pub use stats::{
    CategoryBucket, CategoryStats, DailyStats, DailyStatsAggregator, DashboardSummary,
    InventoryActivity, InventoryEvent, InventoryGauges, PaymentStats, TopProduct,
};
pub use stock::{classify, StockStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against keying 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in centavos (₱100,000.00).
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Highest on-hand count or reorder threshold a record may hold.
pub const MAX_STOCK: i64 = 1_000_000;

/// Highest total cost accepted for one restock, in centavos (₱100,000,000.00).
pub const MAX_COST_CENTS: i64 = 10_000_000_000;

/// Philippine VAT, 12%, in basis points.
pub const DEFAULT_VAT_RATE_BPS: u32 = 1200;

/// The outlet runs on Philippine time (UTC+8).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
