//! # Notification Dispatcher
//!
//! In-process fan-out of domain events to dashboard observers.
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dashboard Fan-out                                │
//! │                                                                         │
//! │  checkout ──► publish(StockChanged) ──┐                                 │
//! │  checkout ──► publish(OrderCompleted) ├──► broadcast ring (capacity N)  │
//! │  checkout ──► publish(StatsUpdated) ──┘          │                      │
//! │                                    ┌─────────────┼─────────────┐        │
//! │                                    ▼             ▼             ▼        │
//! │                              observer #1   observer #2   observer #3    │
//! │                                                                         │
//! │  • publish never waits on observers                                    │
//! │  • no observers: event dropped (DEBUG)                                 │
//! │  • slow observer: oldest events overwritten, observer skips (WARN)     │
//! │  • at-most-once, publish order preserved per observer                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::error::{NotifyError, NotifyResult};
use kusina_core::DomainEvent;

/// Encodes an event as the JSON frame dashboards receive.
pub fn encode(event: &DomainEvent) -> NotifyResult<String> {
    Ok(serde_json::to_string(event)?)
}

/// Publishes domain events to every connected dashboard observer.
///
/// Cheap to clone; clones share the same channel.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: broadcast::Sender<DomainEvent>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher buffering up to `capacity` events per observer.
    ///
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        NotificationDispatcher { tx }
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// Publishes an event, failing with [`NotifyError::NoObservers`] when
    /// nobody is listening.
    pub fn try_publish(&self, event: DomainEvent) -> NotifyResult<usize> {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(reached) => {
                debug!(kind, observers = reached, "Event published");
                Ok(reached)
            }
            Err(_) => Err(NotifyError::NoObservers),
        }
    }

    /// Publishes an event and returns the number of observers reached.
    ///
    /// Never blocks and never fails; an event with no audience is dropped.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let kind = event.kind();
        match self.try_publish(event) {
            Ok(reached) => reached,
            Err(e) => {
                debug!(kind, reason = %e, "Event dropped");
                0
            }
        }
    }

    /// Attaches a new observer. It sees only events published after this call.
    pub fn subscribe(&self) -> DashboardSubscription {
        DashboardSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of observers currently attached.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::from_config(&NotifyConfig::default())
    }
}

/// One dashboard observer's view of the channel.
#[derive(Debug)]
pub struct DashboardSubscription {
    rx: broadcast::Receiver<DomainEvent>,
}

impl DashboardSubscription {
    /// Waits for the next event.
    ///
    /// Events overwritten while this observer lagged are skipped. Returns
    /// [`NotifyError::ChannelClosed`] once every dispatcher clone is gone
    /// and the buffer is drained.
    pub async fn recv(&mut self) -> NotifyResult<DomainEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Ok(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dashboard observer lagged, skipping missed events");
                }
                Err(RecvError::Closed) => return Err(NotifyError::ChannelClosed),
            }
        }
    }

    /// Converts the subscription into a stream that ends when the channel closes.
    pub fn into_stream(self) -> impl Stream<Item = DomainEvent> {
        BroadcastStream::new(self.rx).filter_map(|item| match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "Dashboard stream lagged, skipping missed events");
                None
            }
        })
    }
}
