//! # Observer Reconnection
//!
//! Reconnect-with-backoff for dashboard observers.
//!
//! ## Observer Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  connect() ok   ┌───────────┐   stream closed            │
//! │  │Connecting│ ──────────────► │ Observing │ ─────────────┐             │
//! │  └────┬─────┘  (attempt = 0)  └───────────┘              │             │
//! │       │ ▲                                                 │             │
//! │ failed│ │ timer expired                                   │             │
//! │       ▼ │                                                 │             │
//! │  ┌──────┴───┐ ◄───────────────────────────────────────────┘             │
//! │  │ Backoff  │                                                           │
//! │  └────┬─────┘                                                           │
//! │       │ attempt == max_attempts                                        │
//! │       ▼                                                                 │
//! │   give up (quietly)                                                     │
//! │                                                                         │
//! │  delay(attempt) = min(base × 2^attempt, max)                           │
//! │  defaults: 500ms, 1s, 2s, 4s, 8s, then stop                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::NotifyConfig;
use crate::dispatcher::DashboardSubscription;
use crate::error::NotifyResult;
use kusina_core::DomainEvent;

/// Bounded exponential reconnect schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    base: Duration,
    max: Duration,
    max_attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(base: Duration, max: Duration, max_attempts: u32) -> Self {
        ReconnectPolicy {
            base,
            max: max.max(base),
            max_attempts,
        }
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        Self::new(
            config.reconnect_base(),
            config.reconnect_max(),
            config.reconnect_max_attempts,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before reconnect attempt `attempt` (zero-based), or `None`
    /// once the budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let delay = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.base.checked_mul(factor))
            .unwrap_or(self.max);

        Some(delay.min(self.max))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_config(&NotifyConfig::default())
    }
}

/// Keeps an observer attached to the dashboard channel.
///
/// Calls `connect` and feeds every received event to `handler`. When a
/// connect fails or the stream closes, waits [`ReconnectPolicy::delay_for`]
/// the current attempt and tries again. A successful connect restores the
/// full attempt budget. Returns once `delay_for` has no delay left.
pub async fn observe_with_reconnect<C, Fut, H>(policy: &ReconnectPolicy, mut connect: C, mut handler: H)
where
    C: FnMut() -> Fut,
    Fut: Future<Output = NotifyResult<DashboardSubscription>>,
    H: FnMut(DomainEvent),
{
    let mut attempt = 0u32;

    loop {
        match connect().await {
            Ok(mut subscription) => {
                if attempt > 0 {
                    info!(after_attempts = attempt, "Dashboard observer reconnected");
                }
                attempt = 0;

                loop {
                    match subscription.recv().await {
                        Ok(event) => handler(event),
                        Err(e) => {
                            debug!(reason = %e, "Dashboard stream ended");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                debug!(attempt, error = %e, "Dashboard observer connect failed");
            }
        }

        let Some(delay) = policy.delay_for(attempt) else {
            info!(
                max_attempts = policy.max_attempts(),
                "Dashboard observer giving up after max reconnect attempts"
            );
            return;
        };

        attempt += 1;
        debug!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting dashboard observer");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::NotificationDispatcher;
    use crate::error::NotifyError;
    use kusina_core::DailyStats;
    use std::cell::Cell;

    fn policy(base_ms: u64, max_ms: u64, attempts: u32) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
            attempts,
        )
    }

    #[test]
    fn test_delay_doubles_then_caps() {
        let p = policy(500, 3000, 6);
        let delays: Vec<u128> = (0..6).map(|a| p.delay_for(a).unwrap().as_millis()).collect();
        assert_eq!(delays, vec![500, 1000, 2000, 3000, 3000, 3000]);
        assert_eq!(p.delay_for(6), None);
    }

    #[test]
    fn test_default_schedule() {
        let p = ReconnectPolicy::default();
        assert_eq!(p.delay_for(0), Some(Duration::from_millis(500)));
        assert_eq!(p.delay_for(4), Some(Duration::from_secs(8)));
        assert_eq!(p.delay_for(5), None);
    }

    #[test]
    fn test_huge_attempt_saturates_at_max() {
        let p = policy(500, 30_000, u32::MAX);
        assert_eq!(p.delay_for(40), Some(Duration::from_secs(30)));
    }


    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        observe_with_reconnect(
            &policy(100, 1000, 3),
            || {
                calls.set(calls.get() + 1);
                async { Err(NotifyError::ConnectFailed("refused".into())) }
            },
            |_| {},
        )
        .await;

        // First try plus three retries
        assert_eq!(calls.get(), 4);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(700));
        assert!(waited < Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_follow_capped_schedule() {
        let p = policy(100, 250, 4);
        let connects = std::cell::RefCell::new(Vec::new());
        let start = tokio::time::Instant::now();

        observe_with_reconnect(
            &p,
            || {
                connects.borrow_mut().push(start.elapsed());
                async { Err(NotifyError::ConnectFailed("refused".into())) }
            },
            |_| {},
        )
        .await;

        // 100, 200, then capped at 250
        let gaps: Vec<u128> = connects
            .borrow()
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis())
            .collect();
        let expected: Vec<u128> = (0..4).map(|a| p.delay_for(a).unwrap().as_millis()).collect();
        assert_eq!(gaps, expected);
        assert_eq!(expected, vec![100, 200, 250, 250]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_connect_resets_budget() {
        let calls = Cell::new(0u32);
        let mut received = 0;

        observe_with_reconnect(
            &policy(100, 1000, 2),
            || {
                calls.set(calls.get() + 1);
                let call = calls.get();
                async move {
                    if call == 2 {
                        // One event, then the channel closes
                        let dispatcher = NotificationDispatcher::new(4);
                        let sub = dispatcher.subscribe();
                        let now = chrono::Utc::now();
                        dispatcher.publish(DomainEvent::stats_updated(&DailyStats::empty(
                            now.date_naive(),
                            now,
                        )));
                        Ok(sub)
                    } else {
                        Err(NotifyError::ConnectFailed("refused".into()))
                    }
                }
            },
            |_| received += 1,
        )
        .await;

        // fail, connect (budget restored), fail, fail
        assert_eq!(calls.get(), 4);
        assert_eq!(received, 1);
    }
}
