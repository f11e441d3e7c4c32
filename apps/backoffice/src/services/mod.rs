//! # Back Office Services
//!
//! One module per area. Each function takes `&AppState` and returns
//! `Result<T, ServiceError>`.

pub mod checkout;
pub mod dashboard;
pub mod inventory;
pub mod menu;
pub(crate) mod stats;
