//! # Application State
//!
//! Everything a service needs, built once at startup.
//!
//! ```text
//! AppState
//! ├── db          Database (pool + repositories)
//! ├── dispatcher  NotificationDispatcher (dashboard fan-out)
//! ├── calculator  SettlementCalculator (configured VAT)
//! ├── aggregator  DailyStatsAggregator (configured business day)
//! ├── stats_lock  serializes read-fold-write of the daily stats row
//! └── config      AppConfig (read-only)
//! ```

pub mod config;

pub use config::{AppConfig, ConfigError, ConfigResult};

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use kusina_core::{DailyStatsAggregator, SettlementCalculator, TaxRate};
use kusina_db::{Database, DbConfig};
use kusina_notify::NotificationDispatcher;

use crate::error::ServiceError;

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub dispatcher: NotificationDispatcher,
    pub calculator: SettlementCalculator,
    pub aggregator: DailyStatsAggregator,
    pub stats_lock: Arc<Mutex<()>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires state around an already-open database.
    pub fn new(db: Database, config: AppConfig) -> Result<Self, ServiceError> {
        let aggregator = DailyStatsAggregator::with_offset_hours(config.clock.utc_offset_hours)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "utc_offset_hours {} is out of range",
                    config.clock.utc_offset_hours
                ))
            })?;

        Ok(AppState {
            db,
            dispatcher: NotificationDispatcher::from_config(&config.notify),
            calculator: SettlementCalculator::new(TaxRate::from_bps(config.tax.vat_rate_bps)),
            aggregator,
            stats_lock: Arc::new(Mutex::new(())),
            config: Arc::new(config),
        })
    }

    /// Opens the configured database (running migrations) and wires state.
    pub async fn open(config: AppConfig) -> Result<Self, ServiceError> {
        let path = config.database_path()?;
        info!(?path, "Opening database");

        let db = Database::new(
            DbConfig::new(path).max_connections(config.database.max_connections),
        )
        .await?;

        Self::new(db, config)
    }

    /// Fresh in-memory state for tests.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default()).unwrap()
    }
}
