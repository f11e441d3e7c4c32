//! # Domain Events
//!
//! What the back office tells dashboard observers after a write.
//!
//! ## Wire Shape
//! ```text
//! {"type":"order_completed","order_id":"...","order_number":"ORD-20250301-004",...}
//! {"type":"stock_changed","inventory_item_id":"...","previous_stock":12,"new_stock":9,...}
//! {"type":"stats_updated","orders_today":4,"total_orders":212,"items_sold_today":11}
//! ```
//!
//! Within one checkout the order of emission is fixed: every
//! `stock_changed`, then `order_completed`, then `stats_updated`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::reconcile::StockAdjustment;
use crate::stats::DailyStats;
use crate::stock::StockStatus;
use crate::types::{InventoryRecord, Order, OrderType, PaymentMethod, RestockHistoryEntry};

/// Why a record's stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockChangeReason {
    Sale,
    Restock,
    Adjustment,
}

/// Event pushed to dashboard observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderCompleted {
        order_id: String,
        order_number: String,
        total_cents: i64,
        order_type: OrderType,
        payment_method: PaymentMethod,
        item_count: i64,
        #[ts(as = "String")]
        created_at: DateTime<Utc>,
    },
    StockChanged {
        inventory_item_id: String,
        name: String,
        previous_stock: i64,
        new_stock: i64,
        status: StockStatus,
        reason: StockChangeReason,
    },
    StatsUpdated {
        orders_today: i64,
        total_orders: i64,
        items_sold_today: i64,
        #[serde(default)]
        revenue_today_cents: i64,
        #[serde(default)]
        total_revenue_cents: i64,
    },
}

impl DomainEvent {
    pub fn order_completed(order: &Order) -> Self {
        DomainEvent::OrderCompleted {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            total_cents: order.total_cents,
            order_type: order.order_type,
            payment_method: order.payment_method,
            item_count: order.item_count(),
            created_at: order.created_at,
        }
    }

    /// A sale decrement.
    pub fn stock_sold(adjustment: &StockAdjustment) -> Self {
        DomainEvent::StockChanged {
            inventory_item_id: adjustment.inventory_item_id.clone(),
            name: adjustment.name.clone(),
            previous_stock: adjustment.previous_stock,
            new_stock: adjustment.new_stock,
            status: adjustment.new_status,
            reason: StockChangeReason::Sale,
        }
    }

    pub fn stock_restocked(record: &InventoryRecord, entry: &RestockHistoryEntry) -> Self {
        DomainEvent::StockChanged {
            inventory_item_id: record.id.clone(),
            name: record.name.clone(),
            previous_stock: entry.previous_stock,
            new_stock: entry.new_stock,
            status: record.status(),
            reason: StockChangeReason::Restock,
        }
    }

    /// A manual edit or retirement.
    pub fn stock_adjusted(record: &InventoryRecord, previous_stock: i64) -> Self {
        DomainEvent::StockChanged {
            inventory_item_id: record.id.clone(),
            name: record.name.clone(),
            previous_stock,
            new_stock: record.current_stock,
            status: record.status(),
            reason: StockChangeReason::Adjustment,
        }
    }

    pub fn stats_updated(stats: &DailyStats) -> Self {
        DomainEvent::StatsUpdated {
            orders_today: stats.orders_today,
            total_orders: stats.total_orders,
            items_sold_today: stats.items_sold_today,
            revenue_today_cents: stats.revenue_today_cents,
            total_revenue_cents: stats.total_revenue_cents,
        }
    }

    /// The `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::OrderCompleted { .. } => "order_completed",
            DomainEvent::StockChanged { .. } => "stock_changed",
            DomainEvent::StatsUpdated { .. } => "stats_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, OrderLine, OrderStatus};

    #[test]
    fn test_events_are_tagged_by_type() {
        let record = InventoryRecord::new("Pork Liempo", Category::HotSizzlers, 9, 10, 0, Utc::now());
        let event = DomainEvent::stock_adjusted(&record, 12);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "stock_changed");
        assert_eq!(json["reason"], "adjustment");
        assert_eq!(json["status"], "sufficient");
        assert_eq!(json["previous_stock"], 12);
        assert_eq!(event.kind(), "stock_changed");
    }

    #[test]
    fn test_order_completed_from_order() {
        let order = Order {
            id: "o-1".to_string(),
            order_number: "ORD-20250301-004".to_string(),
            order_type: OrderType::TakeOut,
            status: OrderStatus::Completed,
            lines: vec![
                OrderLine::new("Halo-Halo", 9500, 2),
                OrderLine::new("Turon", 3000, 3),
            ],
            subtotal_cents: 28000,
            tax_cents: 3360,
            total_cents: 31360,
            payment_method: PaymentMethod::Gcash,
            amount_paid_cents: 31360,
            change_cents: 0,
            notes: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(DomainEvent::order_completed(&order)).unwrap();
        assert_eq!(json["type"], "order_completed");
        assert_eq!(json["order_type"], "Take Out");
        assert_eq!(json["payment_method"], "gcash");
        assert_eq!(json["item_count"], 5);
    }

    #[test]
    fn test_event_round_trips_from_json() {
        let raw = r#"{"type":"stats_updated","orders_today":4,"total_orders":212,"items_sold_today":11}"#;
        let event: DomainEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            DomainEvent::StatsUpdated {
                orders_today: 4,
                total_orders: 212,
                items_sold_today: 11,
                revenue_today_cents: 0,
                total_revenue_cents: 0,
            }
        );
    }

    #[test]
    fn test_stats_updated_carries_revenue() {
        let mut stats = DailyStats::empty(chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), Utc::now());
        stats.orders_today = 2;
        stats.revenue_today_cents = 33_600;
        stats.total_revenue_cents = 1_250_000;

        let json = serde_json::to_value(DomainEvent::stats_updated(&stats)).unwrap();
        assert_eq!(json["type"], "stats_updated");
        assert_eq!(json["revenue_today_cents"], 33_600);
        assert_eq!(json["total_revenue_cents"], 1_250_000);
    }
}
