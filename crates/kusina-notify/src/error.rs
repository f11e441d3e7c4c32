//! # Notify Error Types
//!
//! Error types for the dashboard notification channel.
//!
//! Publishing never surfaces these to the event source; they exist for
//! observers and for the reconnect loop.

use thiserror::Error;

/// Result type alias for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Notification error type.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An event was published with nobody listening.
    #[error("No dashboard observers connected")]
    NoObservers,

    /// The dispatcher was dropped; no further events will arrive.
    #[error("Notification channel closed")]
    ChannelClosed,

    /// An observer fell behind and missed events.
    #[error("Observer lagged behind by {0} events")]
    Lagged(u64),

    /// An observer could not (re)attach to the channel.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Invalid notification configuration.
    #[error("Invalid notify configuration: {0}")]
    InvalidConfig(String),

    /// Event payload could not be encoded for the wire.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        NotifyError::SerializationFailed(err.to_string())
    }
}

impl NotifyError {
    /// Returns true if an observer should reconnect after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::ChannelClosed | NotifyError::ConnectFailed(_))
    }
}
