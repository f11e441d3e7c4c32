//! # Notify Configuration
//!
//! Settings for the dashboard channel. Loaded as the `[notify]` section of
//! the back office config file.
//!
//! ```toml
//! [notify]
//! channel_capacity = 256
//! reconnect_base_ms = 500
//! reconnect_max_ms = 30000
//! reconnect_max_attempts = 5
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NotifyError, NotifyResult};

fn default_channel_capacity() -> usize {
    256
}

fn default_reconnect_base_ms() -> u64 {
    500
}

fn default_reconnect_max_ms() -> u64 {
    30_000
}

fn default_reconnect_max_attempts() -> u32 {
    5
}

/// Dashboard channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Events buffered per observer before the slowest one starts lagging.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// First reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,

    /// Upper bound on a single reconnect delay.
    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,

    /// Reconnect attempts before an observer gives up.
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            channel_capacity: default_channel_capacity(),
            reconnect_base_ms: default_reconnect_base_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
        }
    }
}

impl NotifyConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> NotifyResult<()> {
        if self.channel_capacity == 0 {
            return Err(NotifyError::InvalidConfig(
                "channel_capacity must be greater than 0".into(),
            ));
        }

        if self.reconnect_base_ms == 0 {
            return Err(NotifyError::InvalidConfig(
                "reconnect_base_ms must be greater than 0".into(),
            ));
        }

        if self.reconnect_max_ms < self.reconnect_base_ms {
            return Err(NotifyError::InvalidConfig(format!(
                "reconnect_max_ms ({}) must be at least reconnect_base_ms ({})",
                self.reconnect_max_ms, self.reconnect_base_ms
            )));
        }

        if self.reconnect_max_attempts == 0 {
            return Err(NotifyError::InvalidConfig(
                "reconnect_max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn reconnect_base(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_ms)
    }

    pub fn reconnect_max(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotifyConfig::default();
        assert_eq!(config.channel_capacity, 256);
        assert_eq!(config.reconnect_base(), Duration::from_millis(500));
        assert_eq!(config.reconnect_max(), Duration::from_secs(30));
        assert_eq!(config.reconnect_max_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = NotifyConfig::default();

        config.channel_capacity = 0;
        assert!(config.validate().is_err());

        config = NotifyConfig::default();
        config.reconnect_max_ms = 100;
        assert!(config.validate().is_err());

        config = NotifyConfig::default();
        config.reconnect_max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: NotifyConfig = serde_json::from_str(r#"{"channel_capacity": 16}"#).unwrap();
        assert_eq!(config.channel_capacity, 16);
        assert_eq!(config.reconnect_max_attempts, 5);
    }
}
