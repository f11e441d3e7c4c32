//! # Inventory Reconciliation
//!
//! Applies a completed order against inventory, and its inverse: restocking.
//!
//! ## Per-Line, Best-Effort
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order (completed)                                                      │
//! │    line 0 ── inv ref ──► found ──► stock = max(0, stock - qty) ─┐       │
//! │    line 1 ── no ref  ──────────────────────► SkippedLine        │       │
//! │    line 2 ── inv ref ──► missing ──────────► SkippedLine        │       │
//! │                                                                 ▼       │
//! │                                   ReconciliationReport { adjustments,   │
//! │                                                          skipped }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment is authoritative. Once an order is settled it is never rolled
//! back for inventory reasons: a line that cannot be applied is reported
//! and the rest carry on. A decrement that would go negative clamps at zero
//! and is flagged on the adjustment.
//!
//! The functions here are pure over in-memory records. `kusina-db` drives
//! the same [`apply_sale`] / [`restock`] against stored rows.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::stock::StockStatus;
use crate::types::{InventoryRecord, Order, OrderLine, RestockHistoryEntry, RestockRequest};
use crate::validation::{validate_cost_cents, validate_operator_id, validate_restock_quantity};
use crate::MAX_STOCK;

// =============================================================================
// Report Types
// =============================================================================

/// One stock decrement applied to an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockAdjustment {
    pub inventory_item_id: String,
    pub name: String,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub new_status: StockStatus,
    /// The sale asked for more than was on hand; stock stopped at zero.
    pub clamped: bool,
}

/// Why a line was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The line carries no inventory reference.
    MissingReference,
    /// The referenced inventory record does not exist (or was retired).
    NotFound,
    /// The store rejected the write for this line.
    StoreFailure(String),
}

/// A line that reconciliation left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkippedLine {
    pub line_index: usize,
    pub name: String,
    pub inventory_item_id: Option<String>,
    pub reason: SkipReason,
}

/// Outcome of reconciling one order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationReport {
    pub adjustments: Vec<StockAdjustment>,
    pub skipped: Vec<SkippedLine>,
}

impl ReconciliationReport {
    pub fn skip(&mut self, line_index: usize, line: &OrderLine, reason: SkipReason) {
        self.skipped.push(SkippedLine {
            line_index,
            name: line.name.clone(),
            inventory_item_id: line.inventory_item_id.clone(),
            reason,
        });
    }

    /// True when every line was applied.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn clamped_count(&self) -> usize {
        self.adjustments.iter().filter(|a| a.clamped).count()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// Rejects orders that have not reached `completed`.
pub fn ensure_completed(order: &Order) -> CoreResult<()> {
    if order.is_completed() {
        Ok(())
    } else {
        Err(CoreError::InvalidOrderStatus {
            order_number: order.order_number.clone(),
            status: order.status.as_str().to_string(),
        })
    }
}

/// The inventory id a line draws from, or why it has none.
pub fn line_reference(line: &OrderLine) -> Result<&str, SkipReason> {
    match line.inventory_item_id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(SkipReason::MissingReference),
    }
}

/// Decrements `record` by `quantity`, clamping at zero.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use kusina_core::reconcile::apply_sale;
/// use kusina_core::stock::StockStatus;
/// use kusina_core::types::{Category, InventoryRecord};
///
/// let mut rice = InventoryRecord::new("Rice", Category::BudgetMeals, 12, 10, 0, Utc::now());
/// let adj = apply_sale(&mut rice, 5, Utc::now());
/// assert_eq!(adj.new_stock, 7);
/// assert_eq!(adj.new_status, StockStatus::Low);
/// ```
pub fn apply_sale(record: &mut InventoryRecord, quantity: i64, now: DateTime<Utc>) -> StockAdjustment {
    let previous_stock = record.current_stock;
    let wanted = previous_stock.saturating_sub(quantity);
    let new_stock = wanted.max(0);

    record.current_stock = new_stock;
    record.updated_at = now;

    StockAdjustment {
        inventory_item_id: record.id.clone(),
        name: record.name.clone(),
        previous_stock,
        new_stock,
        new_status: record.status(),
        clamped: wanted < 0,
    }
}

/// Reconciles a completed order against an in-memory inventory keyed by id.
///
/// Lines are applied in order, so two lines drawing on the same record see
/// each other's decrement.
pub fn reconcile(
    order: &Order,
    inventory: &mut HashMap<String, InventoryRecord>,
    now: DateTime<Utc>,
) -> CoreResult<ReconciliationReport> {
    ensure_completed(order)?;

    let mut report = ReconciliationReport::default();

    for (index, line) in order.lines.iter().enumerate() {
        let id = match line_reference(line) {
            Ok(id) => id,
            Err(reason) => {
                report.skip(index, line, reason);
                continue;
            }
        };

        match inventory.get_mut(id) {
            Some(record) if record.is_active => {
                report.adjustments.push(apply_sale(record, line.quantity, now));
            }
            _ => report.skip(index, line, SkipReason::NotFound),
        }
    }

    Ok(report)
}

// =============================================================================
// Restock
// =============================================================================

/// Adds stock to `record` and returns the history entry describing it.
///
/// The caller persists the entry alongside the record. The unit cost is the
/// total divided by quantity, rounded half up to the centavo.
pub fn restock(
    record: &mut InventoryRecord,
    request: &RestockRequest,
    now: DateTime<Utc>,
) -> CoreResult<RestockHistoryEntry> {
    validate_restock_quantity(request.quantity)?;
    validate_cost_cents(request.total_cost_cents)?;
    validate_operator_id(&request.operator_id)?;

    if record.id != request.inventory_item_id {
        return Err(CoreError::InventoryItemNotFound(
            request.inventory_item_id.clone(),
        ));
    }

    let total_cost = Money::from_cents(request.total_cost_cents);
    let unit_cost = total_cost
        .split_evenly(request.quantity)
        .unwrap_or_default();

    let previous_stock = record.current_stock;
    let new_stock = previous_stock
        .checked_add(request.quantity)
        .filter(|stock| *stock <= MAX_STOCK)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "current stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        })?;

    record.current_stock = new_stock;
    record.last_restock = Some(now);
    record.updated_at = now;

    Ok(RestockHistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        inventory_item_id: record.id.clone(),
        quantity: request.quantity,
        unit_cost_cents: unit_cost.cents(),
        total_cost_cents: total_cost.cents(),
        previous_stock,
        new_stock: record.current_stock,
        operator_id: request.operator_id.clone(),
        notes: request.notes.clone(),
        restocked_at: now,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, OrderStatus, OrderType, PaymentMethod};

    fn record(name: &str, stock: i64, min: i64) -> InventoryRecord {
        InventoryRecord::new(name, Category::RiceBowlMeals, stock, min, 5000, Utc::now())
    }

    fn order_with(lines: Vec<OrderLine>) -> Order {
        Order {
            id: "o1".to_string(),
            order_number: "ORD-20250101-001".to_string(),
            order_type: OrderType::DineIn,
            status: OrderStatus::Completed,
            lines,
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            amount_paid_cents: 0,
            change_cents: 0,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn stock_map(records: Vec<InventoryRecord>) -> HashMap<String, InventoryRecord> {
        records.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    #[test]
    fn test_decrement_and_reclassify() {
        let adobo = record("Chicken Adobo", 20, 10);
        let id = adobo.id.clone();
        let mut inventory = stock_map(vec![adobo]);

        let order = order_with(vec![OrderLine::new("Chicken Adobo", 15000, 14).with_inventory(&id)]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();

        assert!(report.is_clean());
        let adj = &report.adjustments[0];
        assert_eq!((adj.previous_stock, adj.new_stock), (20, 6));
        assert_eq!(adj.new_status, StockStatus::Low);
        assert_eq!(inventory[&id].current_stock, 6);
        assert_eq!(inventory[&id].status(), StockStatus::Low);
    }

    #[test]
    fn test_missing_inventory_is_skipped_not_fatal() {
        let sisig = record("Pork Sisig", 10, 5);
        let sisig_id = sisig.id.clone();
        let mut inventory = stock_map(vec![sisig]);

        let order = order_with(vec![
            OrderLine::new("Deleted Item", 9000, 1).with_inventory("deleted-id"),
            OrderLine::new("Pork Sisig", 18990, 2).with_inventory(&sisig_id),
        ]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line_index, 0);
        assert_eq!(report.skipped[0].reason, SkipReason::NotFound);
        assert_eq!(report.adjustments.len(), 1);
        assert_eq!(inventory[&sisig_id].current_stock, 8);
        assert!(order.is_completed());
    }

    #[test]
    fn test_line_without_reference_is_skipped() {
        let mut inventory = HashMap::new();
        let order = order_with(vec![OrderLine::new("Open Item", 5000, 1)]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();

        assert_eq!(report.skipped[0].reason, SkipReason::MissingReference);
        assert!(report.adjustments.is_empty());
    }

    #[test]
    fn test_oversell_clamps_to_zero() {
        let tray = record("Pancit Tray", 2, 5);
        let id = tray.id.clone();
        let mut inventory = stock_map(vec![tray]);

        let order = order_with(vec![OrderLine::new("Pancit Tray", 50000, 5).with_inventory(&id)]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();

        let adj = &report.adjustments[0];
        assert_eq!(adj.new_stock, 0);
        assert!(adj.clamped);
        assert_eq!(adj.new_status, StockStatus::Out);
        assert_eq!(report.clamped_count(), 1);
    }

    #[test]
    fn test_lines_sharing_a_record_accumulate() {
        let rice = record("Rice", 10, 10);
        let id = rice.id.clone();
        let mut inventory = stock_map(vec![rice]);

        let order = order_with(vec![
            OrderLine::new("Adobo Bowl", 12000, 3).with_inventory(&id),
            OrderLine::new("Tapa Bowl", 12000, 4).with_inventory(&id),
        ]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();

        assert_eq!(report.adjustments[1].previous_stock, 7);
        assert_eq!(inventory[&id].current_stock, 3);
        assert_eq!(inventory[&id].status(), StockStatus::Critical);
    }

    #[test]
    fn test_retired_record_is_not_found() {
        let mut retired = record("Old Item", 5, 5);
        retired.is_active = false;
        let id = retired.id.clone();
        let mut inventory = stock_map(vec![retired]);

        let order = order_with(vec![OrderLine::new("Old Item", 5000, 1).with_inventory(&id)]);
        let report = reconcile(&order, &mut inventory, Utc::now()).unwrap();
        assert_eq!(report.skipped[0].reason, SkipReason::NotFound);
        assert_eq!(inventory[&id].current_stock, 5);
    }

    #[test]
    fn test_reconcile_refuses_pending_orders() {
        let mut order = order_with(vec![]);
        order.status = OrderStatus::Pending;
        let err = reconcile(&order, &mut HashMap::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrderStatus { .. }));
    }

    #[test]
    fn test_reconciliation_never_goes_negative() {
        let mut inventory = stock_map((0..20).map(|i| record(&format!("item-{i}"), i, 5)).collect());
        let lines = inventory
            .values()
            .map(|r| OrderLine::new(r.name.clone(), 1000, 7).with_inventory(&r.id))
            .collect();

        reconcile(&order_with(lines), &mut inventory, Utc::now()).unwrap();
        assert!(inventory.values().all(|r| r.current_stock >= 0));
    }

    #[test]
    fn test_restock_builds_history_entry() {
        let mut coffee = record("Coffee Beans", 1, 10);
        let now = Utc::now();
        let request = RestockRequest {
            inventory_item_id: coffee.id.clone(),
            quantity: 3,
            total_cost_cents: 10000,
            operator_id: "admin".to_string(),
            notes: Some("Weekly delivery".to_string()),
        };

        let entry = restock(&mut coffee, &request, now).unwrap();

        assert_eq!(coffee.current_stock, 4);
        assert_eq!(coffee.last_restock, Some(now));
        assert_eq!(coffee.status(), StockStatus::Low);
        assert_eq!(entry.previous_stock, 1);
        assert_eq!(entry.new_stock, 4);
        assert_eq!(entry.unit_cost_cents, 3333);
        assert_eq!(entry.total_cost_cents, 10000);
    }

    #[test]
    fn test_restock_past_the_stock_ceiling_is_rejected() {
        let mut rice = record("Jasmine Rice", 5, 10);
        let before = rice.clone();
        let mut request = RestockRequest {
            inventory_item_id: rice.id.clone(),
            quantity: i64::MAX,
            total_cost_cents: 0,
            operator_id: "admin".to_string(),
            notes: None,
        };

        let err = restock(&mut rice, &request, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));

        // each delivery fits, the sum would not
        request.quantity = MAX_STOCK;
        let err = restock(&mut rice, &request, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(rice, before);

        request.quantity = MAX_STOCK - 5;
        restock(&mut rice, &request, Utc::now()).unwrap();
        assert_eq!(rice.current_stock, MAX_STOCK);
    }

    #[test]
    fn test_restock_rejects_bad_input() {
        let mut milk = record("Fresh Milk", 5, 5);
        let mut request = RestockRequest {
            inventory_item_id: milk.id.clone(),
            quantity: 0,
            total_cost_cents: 100,
            operator_id: "admin".to_string(),
            notes: None,
        };
        assert!(matches!(
            restock(&mut milk, &request, Utc::now()),
            Err(CoreError::Validation(_))
        ));

        request.quantity = 2;
        request.total_cost_cents = -1;
        assert!(restock(&mut milk, &request, Utc::now()).is_err());

        request.total_cost_cents = 0;
        request.inventory_item_id = "other".to_string();
        assert!(matches!(
            restock(&mut milk, &request, Utc::now()),
            Err(CoreError::InventoryItemNotFound(_))
        ));
        assert_eq!(milk.current_stock, 5);
    }
}
