//! # Inventory Service
//!
//! Stock records, restocks and the low-stock views.
//!
//! Every change that moves stock emits a `stock_changed` event and refreshes
//! today's inventory gauges. The stats write is best-effort; the inventory
//! write it follows is not.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kusina_core::{
    Category, DomainEvent, InventoryEvent, InventoryRecord, RestockHistoryEntry, RestockRequest,
    StockStatus,
};

use crate::error::ServiceError;
use crate::services::stats;
use crate::state::AppState;

/// History rows returned when the caller does not ask for a limit.
const DEFAULT_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub current_stock: i64,
    pub min_stock: i64,
    pub price_cents: i64,
}

/// Partial edit. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    /// A counted correction, not a sale or delivery.
    pub current_stock: Option<i64>,
    /// The count the correction was made against. Defaults to the count read
    /// when the edit starts; either way a sale landing first fails the edit
    /// with `CONFLICT` instead of being overwritten.
    pub expected_stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub price_cents: Option<i64>,
}

/// Restock outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockOutcome {
    pub record: InventoryRecord,
    pub entry: RestockHistoryEntry,
}

pub async fn create_inventory_item(
    state: &AppState,
    new: NewInventoryItem,
) -> Result<InventoryRecord, ServiceError> {
    debug!(name = %new.name, "create_inventory_item");

    let now = Utc::now();
    let record = InventoryRecord::new(
        new.name.trim(),
        new.category,
        new.current_stock,
        new.min_stock,
        new.price_cents,
        now,
    );
    state.db.inventory().insert(&record).await?;

    info!(id = %record.id, name = %record.name, status = %record.status(), "Inventory item created");

    let daily = stats::best_effort(
        stats::record_inventory_change(state, Some(InventoryEvent::Added), now).await,
        "inventory item added",
    );

    state.dispatcher.publish(DomainEvent::stock_adjusted(&record, 0));
    if let Some(daily) = &daily {
        state.dispatcher.publish(DomainEvent::stats_updated(daily));
    }

    Ok(record)
}

/// Applies a partial edit. Status is re-derived from the stored counts.
///
/// Descriptive fields and the stock count are written separately, each under
/// compare-and-set, so a concurrent checkout's decrement is never lost.
pub async fn update_inventory_item(
    state: &AppState,
    id: &str,
    update: InventoryUpdate,
) -> Result<InventoryRecord, ServiceError> {
    let before = state
        .db
        .inventory()
        .get_by_id(id)
        .await?
        .filter(|r| r.is_active)
        .ok_or_else(|| ServiceError::not_found("Inventory item", id))?;

    let now = Utc::now();
    let mut record = before.clone();

    let describes = update.name.is_some()
        || update.category.is_some()
        || update.min_stock.is_some()
        || update.price_cents.is_some();
    if describes {
        if let Some(name) = update.name {
            record.name = name.trim().to_string();
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(min_stock) = update.min_stock {
            record.min_stock = min_stock;
        }
        if let Some(price_cents) = update.price_cents {
            record.price_cents = price_cents;
        }
        record.updated_at = now;
        record = state.db.inventory().update(&record).await?;
    }

    let mut previous_stock = record.current_stock;
    if let Some(counted) = update.current_stock {
        let expected = update.expected_stock.unwrap_or(before.current_stock);
        previous_stock = expected;
        record = state.db.inventory().adjust_stock(id, expected, counted, now).await?;
    }

    info!(
        id = %record.id,
        previous_stock,
        new_stock = record.current_stock,
        status = %record.status(),
        "Inventory item updated"
    );

    if record.current_stock != previous_stock || record.status() != before.status() {
        state
            .dispatcher
            .publish(DomainEvent::stock_adjusted(&record, previous_stock));
    }

    let daily = stats::best_effort(
        stats::record_inventory_change(state, None, now).await,
        "inventory item updated",
    );
    if let Some(daily) = &daily {
        state.dispatcher.publish(DomainEvent::stats_updated(daily));
    }

    Ok(record)
}

/// Takes a record out of service. It stays in the store for history.
pub async fn retire_inventory_item(state: &AppState, id: &str) -> Result<InventoryRecord, ServiceError> {
    let previous_stock = state
        .db
        .inventory()
        .get_by_id(id)
        .await?
        .map(|r| r.current_stock)
        .unwrap_or_default();

    let now = Utc::now();
    let record = state.db.inventory().retire(id, now).await?;

    state
        .dispatcher
        .publish(DomainEvent::stock_adjusted(&record, previous_stock));

    let daily = stats::best_effort(
        stats::record_inventory_change(state, None, now).await,
        "inventory item retired",
    );
    if let Some(daily) = &daily {
        state.dispatcher.publish(DomainEvent::stats_updated(daily));
    }

    Ok(record)
}

/// Receives a delivery: stock goes up and a history entry is appended.
pub async fn restock_inventory_item(
    state: &AppState,
    request: RestockRequest,
) -> Result<RestockOutcome, ServiceError> {
    debug!(id = %request.inventory_item_id, quantity = request.quantity, "restock_inventory_item");

    let now = Utc::now();
    let (record, entry) = state.db.inventory().restock(&request, now).await?;

    state
        .dispatcher
        .publish(DomainEvent::stock_restocked(&record, &entry));

    let daily = stats::best_effort(
        stats::record_inventory_change(
            state,
            Some(InventoryEvent::Restocked {
                cost_cents: entry.total_cost_cents,
            }),
            now,
        )
        .await,
        "inventory restocked",
    );
    if let Some(daily) = &daily {
        state.dispatcher.publish(DomainEvent::stats_updated(daily));
    }

    Ok(RestockOutcome { record, entry })
}

/// Active records, optionally only those in one status.
pub async fn list_inventory(
    state: &AppState,
    status: Option<StockStatus>,
) -> Result<Vec<InventoryRecord>, ServiceError> {
    let records = match status {
        Some(status) => state.db.inventory().list_by_status(status).await?,
        None => state.db.inventory().list_active().await?,
    };
    Ok(records)
}

/// Low and critical records, most urgent first.
pub async fn reorder_list(state: &AppState) -> Result<Vec<InventoryRecord>, ServiceError> {
    Ok(state.db.inventory().list_needing_reorder().await?)
}

/// Newest first.
pub async fn restock_history(
    state: &AppState,
    id: &str,
    limit: Option<u32>,
) -> Result<Vec<RestockHistoryEntry>, ServiceError> {
    if state.db.inventory().get_by_id(id).await?.is_none() {
        return Err(ServiceError::not_found("Inventory item", id));
    }

    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(state.db.inventory().history(id, limit).await?)
}
