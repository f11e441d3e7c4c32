//! # Dashboard Service
//!
//! Read side for dashboard clients. Live updates arrive through
//! `AppState::dispatcher`; these calls serve the initial render.

use chrono::Utc;

use kusina_core::{DashboardSummary, InventoryGauges, Order};

use crate::error::ServiceError;
use crate::state::AppState;

/// Today's counters with gauges computed from the current records.
pub async fn dashboard_summary(state: &AppState) -> Result<DashboardSummary, ServiceError> {
    let today = state.aggregator.business_day(Utc::now());
    let stats = state.db.stats().get_for_date(today).await?;
    let records = state.db.inventory().list_active().await?;

    let gauges = InventoryGauges::from_records(&records);

    let mut summary = DashboardSummary::from_stats(stats.as_ref(), gauges);
    // stored gauges can trail a failed stats write
    summary.inventory = gauges;
    Ok(summary)
}

/// Most recent orders, newest first.
pub async fn recent_orders(state: &AppState, limit: u32) -> Result<Vec<Order>, ServiceError> {
    Ok(state.db.orders().list_recent(limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::checkout::{checkout, CheckoutLine, CheckoutRequest};
    use crate::services::inventory::{create_inventory_item, NewInventoryItem};
    use crate::services::menu::{create_menu_item, NewMenuItem};
    use kusina_core::{Category, OrderType, PaymentInput};

    #[tokio::test]
    async fn test_empty_day_is_zeros_with_live_gauges() {
        let state = AppState::in_memory().await;
        let record = kusina_core::InventoryRecord::new("Halo-Halo", Category::Drinks, 4, 10, 9500, Utc::now());
        state.db.inventory().insert(&record).await.unwrap();

        let summary = dashboard_summary(&state).await.unwrap();
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.orders_today, 0);
        assert!(summary.top_products.is_empty());
        assert_eq!(summary.inventory.total_items, 1);
        assert_eq!(summary.inventory.low_stock_items, 1);
        assert_eq!(summary.inventory.total_inventory_value_cents, 38000);
    }

    #[tokio::test]
    async fn test_summary_after_checkout() {
        let state = AppState::in_memory().await;
        let record = create_inventory_item(
            &state,
            NewInventoryItem {
                name: "Wintermelon Milk Tea".to_string(),
                category: Category::MilkTea,
                current_stock: 30,
                min_stock: 10,
                price_cents: 9000,
            },
        )
        .await
        .unwrap();
        let item = create_menu_item(
            &state,
            NewMenuItem {
                name: record.name.clone(),
                category: Category::MilkTea,
                price_cents: 9000,
                vatable: true,
                unit: None,
                inventory_item_id: Some(record.id.clone()),
            },
        )
        .await
        .unwrap();

        checkout(
            &state,
            CheckoutRequest {
                order_type: OrderType::TakeOut,
                lines: vec![CheckoutLine {
                    menu_item_id: item.id.clone(),
                    quantity: 3,
                }],
                payment: PaymentInput::gcash(30240),
                notes: None,
            },
        )
        .await
        .unwrap();

        let summary = dashboard_summary(&state).await.unwrap();
        assert_eq!(summary.orders_today, 1);
        assert_eq!(summary.items_sold_today, 3);
        assert_eq!(summary.revenue_today_cents, 30240);
        assert_eq!(summary.total_revenue_cents, 30240);
        assert_eq!(summary.takeout, 1);
        assert_eq!(summary.payment.gcash, 1);
        assert_eq!(summary.categories.milk, 3);
        assert_eq!(summary.total_products, 1);
        assert_eq!(summary.activity.items_added_today, 1);
        assert_eq!(summary.inventory.total_inventory_value_cents, 27 * 9000);

        let recent = recent_orders(&state, 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].lines.len(), 1);
    }
}
