//! Daily stats persistence shared by the checkout and inventory services.
//!
//! Every write re-reads today's and yesterday's rows under
//! `AppState::stats_lock`, folds, refreshes the inventory gauges from live
//! records and upserts. Callers treat failure as non-fatal.

use chrono::{DateTime, Utc};
use tracing::error;

use kusina_core::{DailyStats, InventoryEvent, Order};

use crate::error::ServiceError;
use crate::state::AppState;

pub(crate) async fn fold_order(
    state: &AppState,
    order: &Order,
    now: DateTime<Utc>,
) -> Result<DailyStats, ServiceError> {
    let _guard = state.stats_lock.lock().await;

    let today = state.aggregator.business_day(now);
    let (current, previous) = state.db.stats().get_with_previous(today).await?;
    let folded = state.aggregator.fold(current, previous.as_ref(), order, now);

    let records = state.db.inventory().list_active().await?;
    let stats = state
        .aggregator
        .refresh_inventory(Some(folded), None, &records, now);

    state.db.stats().upsert(&stats).await?;
    Ok(stats)
}

/// Counts an inventory event and refreshes the gauges. With `None` only the
/// gauges change.
pub(crate) async fn record_inventory_change(
    state: &AppState,
    event: Option<InventoryEvent>,
    now: DateTime<Utc>,
) -> Result<DailyStats, ServiceError> {
    let _guard = state.stats_lock.lock().await;

    let today = state.aggregator.business_day(now);
    let (current, previous) = state.db.stats().get_with_previous(today).await?;
    let current = match event {
        Some(event) => Some(state.aggregator.record_inventory_event(
            current,
            previous.as_ref(),
            event,
            now,
        )),
        None => current,
    };

    let records = state.db.inventory().list_active().await?;
    let stats = state
        .aggregator
        .refresh_inventory(current, previous.as_ref(), &records, now);

    state.db.stats().upsert(&stats).await?;
    Ok(stats)
}

/// Logs a failed stats write and moves on.
pub(crate) fn best_effort(
    result: Result<DailyStats, ServiceError>,
    context: &'static str,
) -> Option<DailyStats> {
    match result {
        Ok(stats) => Some(stats),
        Err(e) => {
            error!(context, error = %e, "Daily stats update failed, continuing");
            None
        }
    }
}
