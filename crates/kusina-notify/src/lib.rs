//! # kusina-notify: Dashboard Notification Channel
//!
//! Pushes domain events from the back office to connected dashboards.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dashboard Push Channel                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │               NotificationDispatcher (dispatcher.rs)             │  │
//! │  │                                                                  │  │
//! │  │  Held in application state, cloned into services                │  │
//! │  │  publish(event) -> observers reached                             │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ subscribe()                             │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │          DashboardSubscription + observe_with_reconnect          │  │
//! │  │                                                                  │  │
//! │  │  recv() skips lag, reports closure                              │  │
//! │  │  ReconnectPolicy: base × 2^attempt, capped, bounded attempts     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  EVENTS (JSON, tagged by "type"):                                      │
//! │  • "stock_changed"   - one per adjusted inventory record               │
//! │  • "order_completed" - after the order is persisted                    │
//! │  • "stats_updated"   - after the daily stats fold                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Channel capacity and reconnect settings
//! - [`dispatcher`] - Publisher and observer subscriptions
//! - [`error`] - Notify error types
//! - [`reconnect`] - Backoff policy and the observe loop

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod reconnect;

pub use config::NotifyConfig;
pub use dispatcher::{encode, DashboardSubscription, NotificationDispatcher};
pub use error::{NotifyError, NotifyResult};
pub use reconnect::{observe_with_reconnect, ReconnectPolicy};
