//! # Checkout Service
//!
//! Turns a counter request into a completed order.
//!
//! ```text
//! request ──► resolve menu items ──► settle ──► persist order
//!                 (no writes yet)      │             │
//!                                      │ reject      ▼
//!                                      ▼        reconcile stock ──► stock_changed × n
//!                                 ServiceError       │
//!                                                    ▼
//!                                               fold daily stats
//!                                                    │
//!                                                    ▼
//!                                   order_completed, stats_updated
//! ```
//!
//! Only steps before the order write can fail the request. Stock and stats
//! problems after it are logged and reported, never rolled back.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info};
use uuid::Uuid;

use kusina_core::validation::{validate_order_size, validate_quantity};
use kusina_core::{
    CoreError, DomainEvent, MenuItem, Order, OrderLine, OrderStatus, OrderType, PaymentInput,
    ReconciliationReport, Settlement,
};

use crate::error::ServiceError;
use crate::services::stats;
use crate::state::AppState;

/// One menu item and how many of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub menu_item_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub order_type: OrderType,
    pub lines: Vec<CheckoutLine>,
    pub payment: PaymentInput,
    #[serde(default)]
    pub notes: Option<String>,
}

/// What the cashier gets back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order: Order,
    pub settlement: Settlement,
    pub reconciliation: ReconciliationReport,
}

/// Settles, records and reconciles one order, then notifies dashboards.
pub async fn checkout(state: &AppState, request: CheckoutRequest) -> Result<Receipt, ServiceError> {
    debug!(lines = request.lines.len(), "checkout");

    let lines = resolve_lines(state, &request.lines).await?;
    let settlement = state.calculator.settle(&lines, &request.payment)?;

    let now = Utc::now();
    let business_day = state.aggregator.business_day(now);

    let mut order = Order {
        id: Uuid::new_v4().to_string(),
        order_number: String::new(),
        order_type: request.order_type,
        status: OrderStatus::Completed,
        lines,
        subtotal_cents: settlement.subtotal.cents(),
        tax_cents: settlement.tax.cents(),
        total_cents: settlement.total.cents(),
        payment_method: settlement.method,
        amount_paid_cents: settlement.amount_paid.cents(),
        change_cents: settlement.change.cents(),
        notes: request.notes,
        created_at: now,
    };

    state.db.orders().insert_new(&mut order, business_day).await?;

    info!(
        order_number = %order.order_number,
        total = %settlement.total,
        change = %settlement.change,
        method = ?settlement.method,
        "Order settled"
    );

    let reconciliation = match state.db.inventory().reconcile_order(&order, now).await {
        Ok(report) => report,
        Err(e) => {
            error!(order_number = %order.order_number, error = %e, "Inventory reconciliation failed");
            ReconciliationReport::default()
        }
    };

    for adjustment in &reconciliation.adjustments {
        state.dispatcher.publish(DomainEvent::stock_sold(adjustment));
    }

    let daily = stats::best_effort(stats::fold_order(state, &order, now).await, "checkout");

    state.dispatcher.publish(DomainEvent::order_completed(&order));
    if let Some(daily) = &daily {
        state.dispatcher.publish(DomainEvent::stats_updated(daily));
    }

    Ok(Receipt {
        order,
        settlement,
        reconciliation,
    })
}

/// Freezes each requested menu item into an order line.
///
/// Every id is checked before anything is written.
async fn resolve_lines(
    state: &AppState,
    requested: &[CheckoutLine],
) -> Result<Vec<OrderLine>, ServiceError> {
    validate_order_size(requested.len()).map_err(CoreError::from)?;
    for line in requested {
        validate_quantity(line.quantity).map_err(CoreError::from)?;
    }

    let ids: Vec<String> = requested.iter().map(|l| l.menu_item_id.clone()).collect();
    let items: HashMap<String, MenuItem> = state
        .db
        .menu()
        .get_many(&ids)
        .await?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    requested
        .iter()
        .map(|line| {
            let item = items
                .get(&line.menu_item_id)
                .ok_or_else(|| CoreError::MenuItemNotFound(line.menu_item_id.clone()))?;

            if !item.available {
                return Err(ServiceError::validation(format!(
                    "{} is currently unavailable",
                    item.name
                )));
            }

            Ok(item.to_order_line(line.quantity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::menu::{create_menu_item, retire_menu_item, set_availability, NewMenuItem};
    use kusina_core::{Category, InventoryRecord, SkipReason, StockStatus};

    async fn stocked_item(
        state: &AppState,
        name: &str,
        category: Category,
        price_cents: i64,
        stock: i64,
        min_stock: i64,
    ) -> (InventoryRecord, MenuItem) {
        let record = InventoryRecord::new(name, category, stock, min_stock, price_cents, Utc::now());
        state.db.inventory().insert(&record).await.unwrap();

        let item = create_menu_item(
            state,
            NewMenuItem {
                name: name.to_string(),
                category,
                price_cents,
                vatable: true,
                unit: None,
                inventory_item_id: Some(record.id.clone()),
            },
        )
        .await
        .unwrap();

        (record, item)
    }

    fn request(lines: &[(&MenuItem, i64)], payment: PaymentInput) -> CheckoutRequest {
        CheckoutRequest {
            order_type: OrderType::DineIn,
            lines: lines
                .iter()
                .map(|(item, quantity)| CheckoutLine {
                    menu_item_id: item.id.clone(),
                    quantity: *quantity,
                })
                .collect(),
            payment,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_settles_records_and_reconciles() {
        let state = AppState::in_memory().await;
        let (adobo, adobo_item) =
            stocked_item(&state, "Chicken Adobo", Category::RiceBowlMeals, 10000, 10, 10).await;
        let (_, tea_item) = stocked_item(&state, "Red Tea", Category::Drinks, 5000, 20, 10).await;

        let receipt = checkout(
            &state,
            request(&[(&adobo_item, 2), (&tea_item, 1)], PaymentInput::cash(30000)),
        )
        .await
        .unwrap();

        // 2 × 100 + 50 = 250, VAT 30
        assert_eq!(receipt.settlement.subtotal.cents(), 25000);
        assert_eq!(receipt.settlement.tax.cents(), 3000);
        assert_eq!(receipt.settlement.total.cents(), 28000);
        assert_eq!(receipt.settlement.change.cents(), 2000);
        assert!(receipt.order.order_number.starts_with("ORD-"));
        assert!(receipt.order.order_number.ends_with("-001"));

        let stored = state.db.orders().get_by_id(&receipt.order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 28000);
        assert_eq!(stored.lines.len(), 2);

        let adobo = state.db.inventory().get_by_id(&adobo.id).await.unwrap().unwrap();
        assert_eq!(adobo.current_stock, 8);
        assert_eq!(adobo.status(), StockStatus::Sufficient);
        assert!(receipt.reconciliation.is_clean());

        let today = state.aggregator.business_day(Utc::now());
        let daily = state.db.stats().get_for_date(today).await.unwrap().unwrap();
        assert_eq!(daily.orders_today, 1);
        assert_eq!(daily.items_sold_today, 3);
        assert_eq!(daily.payment.cash, 1);
        assert_eq!(daily.dine_in_orders, 1);
    }

    #[tokio::test]
    async fn test_events_follow_checkout_order() {
        let state = AppState::in_memory().await;
        let (_, item) = stocked_item(&state, "Sizzling Sisig", Category::HotSizzlers, 16800, 5, 10).await;
        let mut observer = state.dispatcher.subscribe();

        checkout(&state, request(&[(&item, 1)], PaymentInput::gcash(20000)))
            .await
            .unwrap();

        let kinds = [
            observer.recv().await.unwrap().kind(),
            observer.recv().await.unwrap().kind(),
            observer.recv().await.unwrap().kind(),
        ];
        assert_eq!(kinds, ["stock_changed", "order_completed", "stats_updated"]);
    }

    #[tokio::test]
    async fn test_insufficient_payment_writes_nothing() {
        let state = AppState::in_memory().await;
        let (record, item) = stocked_item(&state, "Pancit Canton (S)", Category::PartyTray, 5357, 5, 2).await;

        // 53.57 + 6.43 VAT = 60.00 against 50.00 tendered
        let err = checkout(&state, request(&[(&item, 1)], PaymentInput::cash(5000)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);

        let today = state.aggregator.business_day(Utc::now());
        assert_eq!(state.db.orders().count_for_day(today).await.unwrap(), 0);
        let record = state.db.inventory().get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(record.current_stock, 5);
        assert!(state.db.stats().get_for_date(today).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_unavailable_items_rejected() {
        let state = AppState::in_memory().await;
        let (_, item) = stocked_item(&state, "Mocha Frappe", Category::Frappe, 11800, 5, 2).await;

        let mut bad = request(&[(&item, 1)], PaymentInput::cash(20000));
        bad.lines[0].menu_item_id = Uuid::new_v4().to_string();
        let err = checkout(&state, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        set_availability(&state, &item.id, false).await.unwrap();
        let err = checkout(&state, request(&[(&item, 1)], PaymentInput::cash(20000)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_retired_menu_item_cannot_be_sold() {
        let state = AppState::in_memory().await;
        let (record, item) = stocked_item(&state, "Ube Cheese Pandesal", Category::Specialties, 4500, 12, 4).await;

        retire_menu_item(&state, &item.id).await.unwrap();

        let err = checkout(&state, request(&[(&item, 1)], PaymentInput::cash(10000)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let stored = state.db.inventory().get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(stored.current_stock, 12);
        assert!(state.db.orders().list_recent(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_item_is_skipped_not_fatal() {
        let state = AppState::in_memory().await;
        let item = create_menu_item(
            &state,
            NewMenuItem {
                name: "Extra Rice".to_string(),
                category: Category::RiceBowlMeals,
                price_cents: 2000,
                vatable: true,
                unit: None,
                inventory_item_id: None,
            },
        )
        .await
        .unwrap();

        let receipt = checkout(&state, request(&[(&item, 2)], PaymentInput::cash(5000)))
            .await
            .unwrap();

        assert_eq!(receipt.order.status, OrderStatus::Completed);
        assert_eq!(receipt.reconciliation.skipped.len(), 1);
        assert_eq!(receipt.reconciliation.skipped[0].reason, SkipReason::MissingReference);
    }

    #[tokio::test]
    async fn test_overselling_clamps_at_zero() {
        let state = AppState::in_memory().await;
        let (record, item) = stocked_item(&state, "Crispy Pata", Category::Specialties, 39800, 2, 5).await;

        let receipt = checkout(&state, request(&[(&item, 3)], PaymentInput::cash(200000)))
            .await
            .unwrap();

        assert_eq!(receipt.reconciliation.clamped_count(), 1);
        let record = state.db.inventory().get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(record.current_stock, 0);
        assert_eq!(record.status(), StockStatus::Out);
    }

    #[tokio::test]
    async fn test_order_numbers_are_sequential() {
        let state = AppState::in_memory().await;
        let (_, item) = stocked_item(&state, "Tapsilog", Category::BudgetMeals, 9900, 50, 10).await;

        let first = checkout(&state, request(&[(&item, 1)], PaymentInput::cash(20000)))
            .await
            .unwrap();
        let second = checkout(&state, request(&[(&item, 1)], PaymentInput::cash(20000)))
            .await
            .unwrap();

        assert!(first.order.order_number.ends_with("-001"));
        assert!(second.order.order_number.ends_with("-002"));
    }
}
