//! # Daily Stats Repository
//!
//! One row per business day. Scalar counters are columns; nested counters
//! (payment, category, leaderboard, gauges, activity) are JSON text.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kusina_core::DailyStats;

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    date: NaiveDate,
    total_orders: i64,
    items_sold: i64,
    dine_in_orders: i64,
    takeout_orders: i64,
    orders_today: i64,
    items_sold_today: i64,
    total_revenue_cents: i64,
    revenue_today_cents: i64,
    payment_stats: String,
    category_stats: String,
    top_products: String,
    inventory_stats: String,
    activity_stats: String,
    last_updated: DateTime<Utc>,
}

impl TryFrom<StatsRow> for DailyStats {
    type Error = crate::error::DbError;

    fn try_from(row: StatsRow) -> Result<Self, Self::Error> {
        Ok(DailyStats {
            date: row.date,
            total_orders: row.total_orders,
            items_sold: row.items_sold,
            dine_in_orders: row.dine_in_orders,
            takeout_orders: row.takeout_orders,
            orders_today: row.orders_today,
            items_sold_today: row.items_sold_today,
            total_revenue_cents: row.total_revenue_cents,
            revenue_today_cents: row.revenue_today_cents,
            payment: serde_json::from_str(&row.payment_stats)?,
            categories: serde_json::from_str(&row.category_stats)?,
            top_products: serde_json::from_str(&row.top_products)?,
            inventory: serde_json::from_str(&row.inventory_stats)?,
            activity: serde_json::from_str(&row.activity_stats)?,
            last_updated: row.last_updated,
        })
    }
}

/// Repository for daily statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// The record for `date`, if any activity happened that day.
    pub async fn get_for_date(&self, date: NaiveDate) -> DbResult<Option<DailyStats>> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT date, total_orders, items_sold, dine_in_orders, takeout_orders,
                   orders_today, items_sold_today, total_revenue_cents,
                   revenue_today_cents, payment_stats, category_stats,
                   top_products, inventory_stats, activity_stats, last_updated
            FROM daily_stats
            WHERE date = ?1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DailyStats::try_from).transpose()
    }

    /// Today's and yesterday's records, the inputs of a fold.
    pub async fn get_with_previous(
        &self,
        today: NaiveDate,
    ) -> DbResult<(Option<DailyStats>, Option<DailyStats>)> {
        let current = self.get_for_date(today).await?;
        let previous = self.get_for_date(today - Duration::days(1)).await?;
        Ok((current, previous))
    }

    /// Inserts or replaces the record for `stats.date`.
    pub async fn upsert(&self, stats: &DailyStats) -> DbResult<()> {
        debug!(
            date = %stats.date,
            orders_today = stats.orders_today,
            total_orders = stats.total_orders,
            "Saving daily stats"
        );

        sqlx::query(
            r#"
            INSERT INTO daily_stats (
                date, total_orders, items_sold, dine_in_orders, takeout_orders,
                orders_today, items_sold_today, total_revenue_cents,
                revenue_today_cents, payment_stats, category_stats,
                top_products, inventory_stats, activity_stats, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT(date) DO UPDATE SET
                total_orders = excluded.total_orders,
                items_sold = excluded.items_sold,
                dine_in_orders = excluded.dine_in_orders,
                takeout_orders = excluded.takeout_orders,
                orders_today = excluded.orders_today,
                items_sold_today = excluded.items_sold_today,
                total_revenue_cents = excluded.total_revenue_cents,
                revenue_today_cents = excluded.revenue_today_cents,
                payment_stats = excluded.payment_stats,
                category_stats = excluded.category_stats,
                top_products = excluded.top_products,
                inventory_stats = excluded.inventory_stats,
                activity_stats = excluded.activity_stats,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(stats.date)
        .bind(stats.total_orders)
        .bind(stats.items_sold)
        .bind(stats.dine_in_orders)
        .bind(stats.takeout_orders)
        .bind(stats.orders_today)
        .bind(stats.items_sold_today)
        .bind(stats.total_revenue_cents)
        .bind(stats.revenue_today_cents)
        .bind(serde_json::to_string(&stats.payment)?)
        .bind(serde_json::to_string(&stats.categories)?)
        .bind(serde_json::to_string(&stats.top_products)?)
        .bind(serde_json::to_string(&stats.inventory)?)
        .bind(serde_json::to_string(&stats.activity)?)
        .bind(stats.last_updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
