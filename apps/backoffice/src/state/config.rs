//! # Application Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KUSINA_*`)
//! 2. Config file (`kusina.toml`, explicit path or platform config dir)
//! 3. Defaults (this file)
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Kusina ni Aling Nena"
//! currency_symbol = "₱"
//!
//! [database]
//! path = "/var/lib/kusina/kusina.db"
//! max_connections = 5
//!
//! [tax]
//! vat_rate_bps = 1200
//!
//! [clock]
//! utc_offset_hours = 8
//!
//! [notify]
//! channel_capacity = 256
//! reconnect_base_ms = 500
//! reconnect_max_ms = 30000
//! reconnect_max_attempts = 5
//! ```
//!
//! Read-only after startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use kusina_core::validation::validate_tax_rate_bps;
use kusina_core::{DEFAULT_UTC_OFFSET_HOURS, DEFAULT_VAT_RATE_BPS};
use kusina_notify::NotifyConfig;

const CONFIG_FILE_NAME: &str = "kusina.toml";
const DB_FILE_NAME: &str = "kusina.db";

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine a config directory for this platform")]
    NoConfigDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

fn default_store_name() -> String {
    "Kusina".to_string()
}

fn default_currency_symbol() -> String {
    "₱".to_string()
}

/// Outlet identity, shown on receipts and the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_vat_rate_bps() -> u32 {
    DEFAULT_VAT_RATE_BPS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// VAT on vatable lines, in basis points.
    #[serde(default = "default_vat_rate_bps")]
    pub vat_rate_bps: u32,
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            vat_rate_bps: default_vat_rate_bps(),
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

/// Where the business day starts and ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Back office configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub tax: TaxConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store: StoreConfig::default(),
            database: DatabaseSettings::default(),
            tax: TaxConfig::default(),
            clock: ClockConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_rate_bps(self.tax.vat_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !(-12..=14).contains(&self.clock.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_hours must be between -12 and 14, got {}",
                self.clock.utc_offset_hours
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.notify
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Applies `KUSINA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("KUSINA_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(path) = std::env::var("KUSINA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(bps) = std::env::var("KUSINA_VAT_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(v) => self.tax.vat_rate_bps = v,
                Err(_) => warn!(value = %bps, "Ignoring non-numeric KUSINA_VAT_RATE_BPS"),
            }
        }

        if let Ok(hours) = std::env::var("KUSINA_UTC_OFFSET_HOURS") {
            match hours.parse::<i32>() {
                Ok(v) => self.clock.utc_offset_hours = v,
                Err(_) => warn!(value = %hours, "Ignoring non-numeric KUSINA_UTC_OFFSET_HOURS"),
            }
        }

        if let Ok(capacity) = std::env::var("KUSINA_NOTIFY_CAPACITY") {
            if let Ok(v) = capacity.parse::<usize>() {
                self.notify.channel_capacity = v;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kusina", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Database file to open: the configured path, else the platform data dir.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.kusina.pos/kusina.db`
    /// - **Windows**: `%APPDATA%\kusina\pos\data\kusina.db`
    /// - **Linux**: `~/.local/share/pos/kusina.db`
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "kusina", "pos")
            .ok_or(ConfigError::NoConfigDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DB_FILE_NAME))
    }

    /// Formats centavos with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "₱12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.store.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}
