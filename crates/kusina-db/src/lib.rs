//! # kusina-db: Database Layer for the Kusina Back Office
//!
//! SQLite persistence for inventory, menu, orders and daily statistics,
//! using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kusina Back Office Data Flow                       │
//! │                                                                         │
//! │  checkout / restock / dashboard service                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kusina-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ InventoryRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ MenuRepo       │    │ 001_initial  │  │   │
//! │  │   │               │    │ OrderRepo      │    │   _schema    │  │   │
//! │  │   │               │    │ StatsRepo      │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kusina.db (WAL mode)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain rules (classification, settlement, the clamp-at-zero decrement)
//! come from `kusina-core`; this crate only decides how they reach disk.
//!
//! ## Usage
//! ```rust,ignore
//! use kusina_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./kusina.db")).await?;
//! let report = db.inventory().reconcile_order(&order, Utc::now()).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{InventoryRepository, MenuRepository, OrderRepository, StatsRepository};
