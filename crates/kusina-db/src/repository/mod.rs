//! # Repository Module
//!
//! Database repository implementations for the Kusina back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Back office service                                                    │
//! │       │                                                                 │
//! │       │  db.inventory().reconcile_order(&order, now)                    │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── insert / update / retire                                          │
//! │  ├── restock (+ history, one transaction)                              │
//! │  └── reconcile_order (per line, best-effort)                           │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - Inventory records, restock history, sale decrements
//! - [`MenuRepository`] - Menu items
//! - [`OrderRepository`] - Orders and their lines (write-once)
//! - [`StatsRepository`] - Daily statistics

pub mod inventory;
pub mod menu;
pub mod order;
pub mod stats;

pub use inventory::InventoryRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use stats::StatsRepository;
