//! # Order Repository
//!
//! Persists settled orders. Orders are written once, with their lines, in a
//! single transaction, and never updated afterwards.
//!
//! ## Order Numbers
//! ```text
//! business day 2025-03-01 (UTC+8)
//!   count orders already on that day ──► 3
//!   next number                      ──► ORD-20250301-004
//!   INSERT ... UNIQUE(order_number)
//!     └── lost a race? count again and retry
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use kusina_core::{format_order_number, Order, OrderLine, OrderStatus, OrderType, PaymentMethod};

const ORDER_COLUMNS: &str = "id, order_number, order_type, status, subtotal_cents, tax_cents, \
                             total_cents, payment_method, amount_paid_cents, change_cents, \
                             notes, created_at";

const LINE_COLUMNS: &str = "id, menu_item_id, inventory_item_id, name, category, \
                            unit_price_cents, quantity, vatable";

const MAX_NUMBERING_ATTEMPTS: usize = 5;

/// Order header as stored; lines live in `order_lines`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    order_type: OrderType,
    status: OrderStatus,
    subtotal_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    payment_method: PaymentMethod,
    amount_paid_cents: i64,
    change_cents: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            order_type: self.order_type,
            status: self.status,
            lines,
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
            payment_method: self.payment_method,
            amount_paid_cents: self.amount_paid_cents,
            change_cents: self.change_cents,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Number of orders already recorded on `business_day`.
    pub async fn count_for_day(&self, business_day: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE business_day = ?1")
            .bind(business_day)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// The number the next order on `business_day` would get.
    pub async fn next_order_number(&self, business_day: NaiveDate) -> DbResult<String> {
        let count = self.count_for_day(business_day).await?;
        Ok(format_order_number(business_day, (count + 1) as u32))
    }

    /// Numbers and stores a new order with its lines.
    ///
    /// `order.order_number` is overwritten with the allocated number.
    pub async fn insert_new(&self, order: &mut Order, business_day: NaiveDate) -> DbResult<()> {
        for attempt in 0..MAX_NUMBERING_ATTEMPTS {
            order.order_number = self.next_order_number(business_day).await?;

            match self.insert(order, business_day).await {
                Ok(()) => {
                    info!(
                        order_number = %order.order_number,
                        total_cents = order.total_cents,
                        lines = order.lines.len(),
                        "Order recorded"
                    );
                    return Ok(());
                }
                Err(DbError::UniqueViolation { ref field, .. }) if field.contains("order_number") => {
                    debug!(
                        order_number = %order.order_number,
                        attempt = attempt + 1,
                        "Order number taken, reallocating"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::duplicate("order_number", order.order_number.clone()))
    }

    /// Stores an order and its lines in one transaction.
    pub async fn insert(&self, order: &Order, business_day: NaiveDate) -> DbResult<()> {
        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, business_day, order_type, status,
                subtotal_cents, tax_cents, total_cents,
                payment_method, amount_paid_cents, change_cents,
                notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(business_day)
        .bind(order.order_type)
        .bind(order.status)
        .bind(order.subtotal_cents)
        .bind(order.tax_cents)
        .bind(order.total_cents)
        .bind(order.payment_method)
        .bind(order.amount_paid_cents)
        .bind(order.change_cents)
        .bind(&order.notes)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, position, menu_item_id, inventory_item_id,
                    name, category, unit_price_cents, quantity, vatable
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&line.id)
            .bind(&order.id)
            .bind(position as i64)
            .bind(&line.menu_item_id)
            .bind(&line.inventory_item_id)
            .bind(&line.name)
            .bind(line.category)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.vatable)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let lines = self.lines_for(&row.id).await?;
                Ok(Some(row.into_order(lines)))
            }
            None => Ok(None),
        }
    }

    /// Gets an order by its human-readable number.
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let lines = self.lines_for(&row.id).await?;
                Ok(Some(row.into_order(lines)))
            }
            None => Ok(None),
        }
    }

    /// Most recent orders first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, order_number DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.lines_for(&row.id).await?;
            orders.push(row.into_order(lines));
        }

        Ok(orders)
    }

    async fn lines_for(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY position"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
