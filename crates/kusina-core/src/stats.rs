//! # Daily Statistics
//!
//! Folds completed orders and inventory events into one record per
//! business day, and derives the dashboard summary from it.
//!
//! ## Day Rollover
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  yesterday (date = D-1)              today (date = D), first fold       │
//! │  ┌──────────────────────┐            ┌──────────────────────┐           │
//! │  │ total_orders     120 │ ─carry───► │ total_orders     120 │ + 1       │
//! │  │ items_sold       480 │ ─carry───► │ items_sold       480 │ + qty     │
//! │  │ dine_in / takeout    │ ─carry───► │ dine_in / takeout    │           │
//! │  │ payment, categories  │ ─carry───► │ payment, categories  │           │
//! │  │ gauges               │ ─carry───► │ gauges               │           │
//! │  │ orders_today      37 │    reset   │ orders_today       0 │ + 1       │
//! │  │ items_sold_today 140 │    reset   │ items_sold_today   0 │ + qty     │
//! │  │ top_products [...]   │    reset   │ top_products []      │           │
//! │  │ activity (added...)  │    reset   │ activity 0           │           │
//! │  └──────────────────────┘            └──────────────────────┘           │
//! │                                                                         │
//! │  Only a record dated exactly D-1 seeds the new day. Older records       │
//! │  mean the outlet was closed and today starts from zero.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The business day is the calendar date at the configured UTC offset
//! (UTC+8 by default), not the UTC date.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stock::StockStatus;
use crate::types::{Category, InventoryRecord, Order, OrderType, PaymentMethod};

/// Leaderboard length.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

// =============================================================================
// Counters
// =============================================================================

/// Orders per payment method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentStats {
    pub cash: i64,
    pub gcash: i64,
}

impl PaymentStats {
    pub fn increment(&mut self, method: PaymentMethod) {
        match method {
            PaymentMethod::Cash => self.cash += 1,
            PaymentMethod::Gcash => self.gcash += 1,
        }
    }

    /// Counts a payment by its label. Unknown labels are ignored.
    ///
    /// Returns whether the label was counted.
    pub fn increment_label(&mut self, label: &str) -> bool {
        match label.parse::<PaymentMethod>() {
            Ok(method) => {
                self.increment(method);
                true
            }
            Err(_) => false,
        }
    }
}

/// Dashboard grouping of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CategoryBucket {
    Rice,
    Sizzling,
    Party,
    Drink,
    Cafe,
    Milk,
    Frappe,
}

impl Category {
    /// The dashboard bucket this category counts toward, if any.
    pub const fn bucket(&self) -> Option<CategoryBucket> {
        match self {
            Category::RiceBowlMeals | Category::BudgetMeals => Some(CategoryBucket::Rice),
            Category::HotSizzlers => Some(CategoryBucket::Sizzling),
            Category::PartyTray => Some(CategoryBucket::Party),
            Category::Drinks => Some(CategoryBucket::Drink),
            Category::Coffee => Some(CategoryBucket::Cafe),
            Category::MilkTea => Some(CategoryBucket::Milk),
            Category::Frappe => Some(CategoryBucket::Frappe),
            Category::SnacksAndAppetizer | Category::Specialties => None,
        }
    }
}

/// Units sold per dashboard bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryStats {
    pub rice: i64,
    pub sizzling: i64,
    pub party: i64,
    pub drink: i64,
    pub cafe: i64,
    pub milk: i64,
    pub frappe: i64,
}

impl CategoryStats {
    pub fn add(&mut self, bucket: CategoryBucket, quantity: i64) {
        let slot = match bucket {
            CategoryBucket::Rice => &mut self.rice,
            CategoryBucket::Sizzling => &mut self.sizzling,
            CategoryBucket::Party => &mut self.party,
            CategoryBucket::Drink => &mut self.drink,
            CategoryBucket::Cafe => &mut self.cafe,
            CategoryBucket::Milk => &mut self.milk,
            CategoryBucket::Frappe => &mut self.frappe,
        };
        *slot += quantity;
    }

    pub fn get(&self, bucket: CategoryBucket) -> i64 {
        match bucket {
            CategoryBucket::Rice => self.rice,
            CategoryBucket::Sizzling => self.sizzling,
            CategoryBucket::Party => self.party,
            CategoryBucket::Drink => self.drink,
            CategoryBucket::Cafe => self.cafe,
            CategoryBucket::Milk => self.milk,
            CategoryBucket::Frappe => self.frappe,
        }
    }
}

/// Leaderboard entry, keyed by product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub name: String,
    pub quantity: i64,
}

/// Gauges recomputed from current inventory, never accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryGauges {
    pub total_items: i64,
    /// Low plus critical.
    pub low_stock_items: i64,
    pub critical_items: i64,
    pub out_of_stock_items: i64,
    pub total_inventory_value_cents: i64,
}

impl InventoryGauges {
    /// Gauges over the active records in `records`.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a InventoryRecord>,
    {
        let mut gauges = InventoryGauges::default();
        let mut value = Money::zero();

        for record in records.into_iter().filter(|r| r.is_active) {
            let status = record.status();
            gauges.total_items += 1;
            if status.needs_reorder() {
                gauges.low_stock_items += 1;
            }
            if status == StockStatus::Critical {
                gauges.critical_items += 1;
            }
            if status == StockStatus::Out {
                gauges.out_of_stock_items += 1;
            }
            value += record.stock_value();
        }

        gauges.total_inventory_value_cents = value.cents();
        gauges
    }
}

/// Inventory activity counted per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryActivity {
    pub items_added_today: i64,
    pub items_restocked_today: i64,
    pub restock_cost_today_cents: i64,
}

/// An inventory change that counts toward today's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryEvent {
    Added,
    Restocked { cost_cents: i64 },
}

// =============================================================================
// Daily Stats
// =============================================================================

/// One business day of counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyStats {
    #[ts(as = "String")]
    pub date: NaiveDate,

    // Cumulative, carried from the previous day
    pub total_orders: i64,
    pub items_sold: i64,
    pub dine_in_orders: i64,
    pub takeout_orders: i64,
    pub payment: PaymentStats,
    pub categories: CategoryStats,
    /// Sum of completed order totals, VAT included.
    pub total_revenue_cents: i64,

    // Reset every day
    pub orders_today: i64,
    pub items_sold_today: i64,
    pub revenue_today_cents: i64,
    pub top_products: Vec<TopProduct>,
    pub activity: InventoryActivity,

    pub inventory: InventoryGauges,

    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl DailyStats {
    /// An all-zero record for `date`.
    pub fn empty(date: NaiveDate, now: DateTime<Utc>) -> Self {
        DailyStats {
            date,
            total_orders: 0,
            items_sold: 0,
            dine_in_orders: 0,
            takeout_orders: 0,
            payment: PaymentStats::default(),
            categories: CategoryStats::default(),
            total_revenue_cents: 0,
            orders_today: 0,
            items_sold_today: 0,
            revenue_today_cents: 0,
            top_products: Vec::new(),
            activity: InventoryActivity::default(),
            inventory: InventoryGauges::default(),
            last_updated: now,
        }
    }

    /// A new record for `date` carrying `previous`'s cumulative counters.
    pub fn seeded_from(previous: &DailyStats, date: NaiveDate, now: DateTime<Utc>) -> Self {
        DailyStats {
            date,
            total_orders: previous.total_orders,
            items_sold: previous.items_sold,
            dine_in_orders: previous.dine_in_orders,
            takeout_orders: previous.takeout_orders,
            payment: previous.payment,
            categories: previous.categories,
            total_revenue_cents: previous.total_revenue_cents,
            inventory: previous.inventory,
            ..DailyStats::empty(date, now)
        }
    }

    /// Upserts `name` on the leaderboard, then re-ranks and truncates.
    ///
    /// Ties keep their first-seen order.
    pub fn record_product(&mut self, name: &str, quantity: i64) {
        match self.top_products.iter_mut().find(|p| p.name == name) {
            Some(product) => product.quantity += quantity,
            None => self.top_products.push(TopProduct {
                name: name.to_string(),
                quantity,
            }),
        }
        self.top_products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        self.top_products.truncate(TOP_PRODUCTS_LIMIT);
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Folds activity into [`DailyStats`] using a fixed business-day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyStatsAggregator {
    utc_offset: FixedOffset,
}

impl Default for DailyStatsAggregator {
    fn default() -> Self {
        DailyStatsAggregator::with_offset_hours(crate::DEFAULT_UTC_OFFSET_HOURS)
            .unwrap_or_else(|| DailyStatsAggregator::new(Utc.fix()))
    }
}

impl DailyStatsAggregator {
    pub fn new(utc_offset: FixedOffset) -> Self {
        DailyStatsAggregator { utc_offset }
    }

    /// `None` when the offset is outside ±24h.
    pub fn with_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Self::new)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Calendar date of `now` at the outlet.
    pub fn business_day(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    /// Today's record to fold into: `current` if it is today's, otherwise a
    /// fresh one seeded from `previous` when that is exactly yesterday's.
    fn open_day(
        &self,
        current: Option<DailyStats>,
        previous: Option<&DailyStats>,
        now: DateTime<Utc>,
    ) -> DailyStats {
        let today = self.business_day(now);

        if let Some(stats) = current.filter(|s| s.date == today) {
            return stats;
        }

        match previous.filter(|p| p.date == today - Duration::days(1)) {
            Some(yesterday) => DailyStats::seeded_from(yesterday, today, now),
            None => DailyStats::empty(today, now),
        }
    }

    /// Folds one completed order into today's record.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use kusina_core::stats::DailyStatsAggregator;
    /// # use kusina_core::types::*;
    /// # let order = Order {
    /// #     id: "o".into(), order_number: "ORD-1".into(), order_type: OrderType::DineIn,
    /// #     status: OrderStatus::Completed, lines: vec![OrderLine::new("Tea", 5000, 2)],
    /// #     subtotal_cents: 10000, tax_cents: 1200, total_cents: 11200,
    /// #     payment_method: PaymentMethod::Cash, amount_paid_cents: 11200,
    /// #     change_cents: 0, notes: None, created_at: Utc::now(),
    /// # };
    ///
    /// let agg = DailyStatsAggregator::default();
    /// let stats = agg.fold(None, None, &order, Utc::now());
    /// assert_eq!(stats.orders_today, 1);
    /// assert_eq!(stats.items_sold_today, 2);
    /// ```
    pub fn fold(
        &self,
        current: Option<DailyStats>,
        previous: Option<&DailyStats>,
        order: &Order,
        now: DateTime<Utc>,
    ) -> DailyStats {
        let mut stats = self.open_day(current, previous, now);
        let items = order.item_count();

        stats.total_orders += 1;
        stats.orders_today += 1;
        stats.items_sold += items;
        stats.items_sold_today += items;
        stats.total_revenue_cents = stats.total_revenue_cents.saturating_add(order.total_cents);
        stats.revenue_today_cents = stats.revenue_today_cents.saturating_add(order.total_cents);

        match order.order_type {
            OrderType::DineIn => stats.dine_in_orders += 1,
            OrderType::TakeOut => stats.takeout_orders += 1,
        }

        stats.payment.increment(order.payment_method);

        for line in &order.lines {
            if let Some(bucket) = line.category.and_then(|c| c.bucket()) {
                stats.categories.add(bucket, line.quantity);
            }
            stats.record_product(&line.name, line.quantity);
        }

        stats.last_updated = now;
        stats
    }

    /// Counts an inventory add or restock toward today's activity.
    pub fn record_inventory_event(
        &self,
        current: Option<DailyStats>,
        previous: Option<&DailyStats>,
        event: InventoryEvent,
        now: DateTime<Utc>,
    ) -> DailyStats {
        let mut stats = self.open_day(current, previous, now);

        match event {
            InventoryEvent::Added => stats.activity.items_added_today += 1,
            InventoryEvent::Restocked { cost_cents } => {
                stats.activity.items_restocked_today += 1;
                stats.activity.restock_cost_today_cents += cost_cents;
            }
        }

        stats.last_updated = now;
        stats
    }

    /// Replaces today's gauges with ones computed from `records`.
    pub fn refresh_inventory(
        &self,
        current: Option<DailyStats>,
        previous: Option<&DailyStats>,
        records: &[InventoryRecord],
        now: DateTime<Utc>,
    ) -> DailyStats {
        let mut stats = self.open_day(current, previous, now);
        stats.inventory = InventoryGauges::from_records(records);
        stats.last_updated = now;
        stats
    }
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// What the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_orders: i64,
    /// Distinct products on today's leaderboard.
    pub total_products: i64,
    /// Units sold, cumulative.
    pub total_stocks: i64,
    pub orders_today: i64,
    pub items_sold_today: i64,
    pub total_revenue_cents: i64,
    pub revenue_today_cents: i64,
    pub dine_in: i64,
    pub takeout: i64,
    pub payment: PaymentStats,
    pub categories: CategoryStats,
    pub top_products: Vec<TopProduct>,
    pub inventory: InventoryGauges,
    pub activity: InventoryActivity,
}

impl DashboardSummary {
    /// Summary of today's record, or zeros with live gauges when there is none.
    pub fn from_stats(stats: Option<&DailyStats>, live_gauges: InventoryGauges) -> Self {
        match stats {
            Some(s) => DashboardSummary {
                total_orders: s.total_orders,
                total_products: s.top_products.len() as i64,
                total_stocks: s.items_sold,
                orders_today: s.orders_today,
                items_sold_today: s.items_sold_today,
                total_revenue_cents: s.total_revenue_cents,
                revenue_today_cents: s.revenue_today_cents,
                dine_in: s.dine_in_orders,
                takeout: s.takeout_orders,
                payment: s.payment,
                categories: s.categories,
                top_products: s.top_products.clone(),
                inventory: s.inventory,
                activity: s.activity,
            },
            None => DashboardSummary {
                total_orders: 0,
                total_products: 0,
                total_stocks: 0,
                orders_today: 0,
                items_sold_today: 0,
                total_revenue_cents: 0,
                revenue_today_cents: 0,
                dine_in: 0,
                takeout: 0,
                payment: PaymentStats::default(),
                categories: CategoryStats::default(),
                top_products: Vec::new(),
                inventory: live_gauges,
                activity: InventoryActivity::default(),
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderLine, OrderStatus};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn order(order_type: OrderType, method: PaymentMethod, lines: Vec<OrderLine>) -> Order {
        Order {
            id: uuid::Uuid::new_v4().to_string(),
            order_number: "ORD-20250301-001".to_string(),
            order_type,
            status: OrderStatus::Completed,
            lines,
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            payment_method: method,
            amount_paid_cents: 0,
            change_cents: 0,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn bowl(qty: i64) -> OrderLine {
        OrderLine::new("Bulgogi Rice Bowl", 12900, qty).with_category(Category::RiceBowlMeals)
    }

    #[test]
    fn test_two_orders_same_day_seeded_from_yesterday() {
        let agg = DailyStatsAggregator::default();
        let now = at(2025, 3, 1, 4); // 12:00 in UTC+8
        let today = agg.business_day(now);

        let mut yesterday = DailyStats::empty(today - Duration::days(1), now);
        yesterday.total_orders = 40;
        yesterday.items_sold = 90;
        yesterday.orders_today = 40;
        yesterday.payment.cash = 30;

        let first = agg.fold(
            None,
            Some(&yesterday),
            &order(OrderType::DineIn, PaymentMethod::Cash, vec![bowl(2)]),
            now,
        );
        let second = agg.fold(
            Some(first),
            Some(&yesterday),
            &order(OrderType::TakeOut, PaymentMethod::Gcash, vec![bowl(1)]),
            now + Duration::minutes(5),
        );

        assert_eq!(second.date, today);
        assert_eq!(second.orders_today, 2);
        assert_eq!(second.total_orders, 42);
        assert_eq!(second.items_sold, 93);
        assert_eq!(second.items_sold_today, 3);
        assert_eq!(second.dine_in_orders, 1);
        assert_eq!(second.takeout_orders, 1);
        assert_eq!(second.payment, PaymentStats { cash: 31, gcash: 1 });
    }

    #[test]
    fn test_older_record_does_not_seed() {
        let agg = DailyStatsAggregator::default();
        let now = at(2025, 3, 10, 4);
        let mut stale = DailyStats::empty(agg.business_day(now) - Duration::days(3), now);
        stale.total_orders = 500;

        let stats = agg.fold(
            None,
            Some(&stale),
            &order(OrderType::DineIn, PaymentMethod::Cash, vec![bowl(1)]),
            now,
        );
        assert_eq!(stats.total_orders, 1);
    }

    #[test]
    fn test_stale_current_record_rolls_over() {
        let agg = DailyStatsAggregator::default();
        let day_one = at(2025, 3, 1, 4);
        let day_two = day_one + Duration::days(1);

        let first = agg.fold(
            None,
            None,
            &order(OrderType::DineIn, PaymentMethod::Cash, vec![bowl(2)]),
            day_one,
        );
        let next = agg.fold(
            Some(first.clone()),
            Some(&first),
            &order(OrderType::DineIn, PaymentMethod::Cash, vec![bowl(1)]),
            day_two,
        );

        assert_eq!(next.date, agg.business_day(day_two));
        assert_eq!(next.orders_today, 1);
        assert_eq!(next.total_orders, 2);
        assert_eq!(next.top_products[0].quantity, 1);
    }

    #[test]
    fn test_revenue_carries_forward_and_resets_daily() {
        let agg = DailyStatsAggregator::default();
        let day_one = at(2025, 3, 1, 4);
        let day_two = day_one + Duration::days(1);

        let mut sale = order(OrderType::DineIn, PaymentMethod::Cash, vec![bowl(2)]);
        sale.total_cents = 28896;
        let first = agg.fold(None, None, &sale, day_one);

        sale.total_cents = 10000;
        let first = agg.fold(Some(first), None, &sale, day_one);
        assert_eq!(first.revenue_today_cents, 38896);
        assert_eq!(first.total_revenue_cents, 38896);

        sale.total_cents = 14448;
        let next = agg.fold(None, Some(&first), &sale, day_two);
        assert_eq!(next.revenue_today_cents, 14448);
        assert_eq!(next.total_revenue_cents, 53344);

        let summary = DashboardSummary::from_stats(Some(&next), InventoryGauges::default());
        assert_eq!(summary.revenue_today_cents, 14448);
        assert_eq!(summary.total_revenue_cents, 53344);
    }

    #[test]
    fn test_inventory_events_leave_revenue_alone() {
        let agg = DailyStatsAggregator::default();
        let now = at(2025, 3, 1, 4);
        let mut sale = order(OrderType::TakeOut, PaymentMethod::Gcash, vec![bowl(1)]);
        sale.total_cents = 14448;

        let stats = agg.fold(None, None, &sale, now);
        let stats = agg.record_inventory_event(
            Some(stats),
            None,
            InventoryEvent::Restocked { cost_cents: 50000 },
            now,
        );
        assert_eq!(stats.revenue_today_cents, 14448);
        assert_eq!(stats.activity.restock_cost_today_cents, 50000);
    }

    #[test]
    fn test_business_day_uses_outlet_offset() {
        let agg = DailyStatsAggregator::default();
        // 17:00 UTC on the 1st is 01:00 on the 2nd in Manila
        let now = at(2025, 3, 1, 17);
        assert_eq!(agg.business_day(now), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());

        let utc = DailyStatsAggregator::with_offset_hours(0).unwrap();
        assert_eq!(utc.business_day(now), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_category_comes_from_field_not_name() {
        let agg = DailyStatsAggregator::default();
        let lines = vec![
            // Name mentions milk, category says drink
            OrderLine::new("Red Tea with Milk Foam", 6000, 2).with_category(Category::Drinks),
            OrderLine::new("Chicken Wings", 15000, 1).with_category(Category::SnacksAndAppetizer),
            OrderLine::new("Mystery Item", 1000, 4),
        ];

        let stats = agg.fold(
            None,
            None,
            &order(OrderType::DineIn, PaymentMethod::Cash, lines),
            at(2025, 3, 1, 4),
        );

        assert_eq!(stats.categories.get(CategoryBucket::Drink), 2);
        assert_eq!(stats.categories.get(CategoryBucket::Milk), 0);
        let bucketed: i64 = [
            CategoryBucket::Rice,
            CategoryBucket::Sizzling,
            CategoryBucket::Party,
            CategoryBucket::Drink,
            CategoryBucket::Cafe,
            CategoryBucket::Milk,
            CategoryBucket::Frappe,
        ]
        .iter()
        .map(|b| stats.categories.get(*b))
        .sum();
        assert_eq!(bucketed, 2);
        assert_eq!(stats.items_sold_today, 7);
    }

    #[test]
    fn test_top_products_ranked_and_truncated() {
        let mut stats = DailyStats::empty(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), Utc::now());
        for i in 0..12 {
            stats.record_product(&format!("Item {i}"), i + 1);
        }
        // Item 0 fell off the board; it re-enters from scratch
        stats.record_product("Item 0", 100);

        assert_eq!(stats.top_products.len(), TOP_PRODUCTS_LIMIT);
        assert_eq!(stats.top_products[0].name, "Item 0");
        assert_eq!(stats.top_products[0].quantity, 100);
        assert!(stats
            .top_products
            .windows(2)
            .all(|w| w[0].quantity >= w[1].quantity));
        assert!(!stats.top_products.iter().any(|p| p.name == "Item 1"));
    }

    #[test]
    fn test_unknown_payment_label_is_ignored() {
        let mut payment = PaymentStats::default();
        assert!(payment.increment_label("GCash"));
        assert!(!payment.increment_label("credit card"));
        assert_eq!(payment, PaymentStats { cash: 0, gcash: 1 });
    }

    #[test]
    fn test_inventory_events_reset_daily() {
        let agg = DailyStatsAggregator::default();
        let day_one = at(2025, 3, 1, 4);

        let stats = agg.record_inventory_event(None, None, InventoryEvent::Added, day_one);
        let stats = agg.record_inventory_event(
            Some(stats),
            None,
            InventoryEvent::Restocked { cost_cents: 25000 },
            day_one,
        );
        assert_eq!(stats.activity.items_added_today, 1);
        assert_eq!(stats.activity.items_restocked_today, 1);
        assert_eq!(stats.activity.restock_cost_today_cents, 25000);

        let next = agg.record_inventory_event(
            Some(stats.clone()),
            Some(&stats),
            InventoryEvent::Added,
            day_one + Duration::days(1),
        );
        assert_eq!(next.activity.items_added_today, 1);
        assert_eq!(next.activity.restock_cost_today_cents, 0);
    }

    #[test]
    fn test_gauges_from_records() {
        let now = Utc::now();
        let mut retired = InventoryRecord::new("Old", Category::Drinks, 0, 5, 100, now);
        retired.is_active = false;
        let records = vec![
            InventoryRecord::new("Rice", Category::RiceBowlMeals, 50, 10, 200, now),
            InventoryRecord::new("Pork", Category::HotSizzlers, 3, 10, 1000, now),
            InventoryRecord::new("Milk", Category::MilkTea, 6, 10, 500, now),
            InventoryRecord::new("Ice", Category::Frappe, 0, 10, 50, now),
            retired,
        ];

        let gauges = InventoryGauges::from_records(&records);
        assert_eq!(gauges.total_items, 4);
        assert_eq!(gauges.low_stock_items, 2);
        assert_eq!(gauges.critical_items, 1);
        assert_eq!(gauges.out_of_stock_items, 1);
        assert_eq!(gauges.total_inventory_value_cents, 50 * 200 + 3 * 1000 + 6 * 500);
    }

    #[test]
    fn test_dashboard_summary_without_record() {
        let gauges = InventoryGauges {
            total_items: 5,
            ..Default::default()
        };
        let summary = DashboardSummary::from_stats(None, gauges);
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.inventory.total_items, 5);
    }

    #[test]
    fn test_dashboard_summary_from_record() {
        let agg = DailyStatsAggregator::default();
        let stats = agg.fold(
            None,
            None,
            &order(
                OrderType::TakeOut,
                PaymentMethod::Cash,
                vec![bowl(3), OrderLine::new("Iced Coffee", 9000, 1)],
            ),
            at(2025, 3, 1, 4),
        );

        let summary = DashboardSummary::from_stats(Some(&stats), InventoryGauges::default());
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.total_stocks, 4);
        assert_eq!(summary.takeout, 1);
    }
}
