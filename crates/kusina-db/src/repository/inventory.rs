//! # Inventory Repository
//!
//! Stored inventory records, their restock history, and the per-line sale
//! decrements that reconcile a completed order.
//!
//! ## Writes That Touch Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  restock()            one transaction                                   │
//! │    SELECT record ──► core::restock ──► UPDATE record ──► INSERT history │
//! │                                                                         │
//! │  reconcile_order()    one statement per line, no transaction            │
//! │    for line in order.lines:                                             │
//! │      SELECT record ──► core::apply_sale ──► UPDATE ... WHERE            │
//! │                                             current_stock = previous    │
//! │      lost the race? re-read and retry (bounded)                         │
//! │      missing / failed? SkippedLine, WARN, next line                     │
//! │                                                                         │
//! │  update()             descriptive fields only, CAS on current_stock     │
//! │  adjust_stock()       counted correction, CAS on the expected count     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cached `status` column is written only from
//! [`InventoryRecord::status`], never from caller input.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use kusina_core::reconcile::{self, ensure_completed, line_reference};
use kusina_core::validation::{
    validate_item_name, validate_min_stock, validate_price_cents, validate_stock,
};
use kusina_core::{
    InventoryRecord, Order, ReconciliationReport, RestockHistoryEntry, RestockRequest, SkipReason,
    StockAdjustment, StockStatus,
};

const RECORD_COLUMNS: &str = "id, name, category, current_stock, min_stock, price_cents, \
                              is_active, last_restock, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, inventory_item_id, quantity, unit_cost_cents, \
                               total_cost_cents, previous_stock, new_stock, operator_id, \
                               notes, restocked_at";

/// Attempts at a compare-and-set write before giving up.
const MAX_CAS_ATTEMPTS: usize = 3;

/// Repository for inventory records and restock history.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Inserts a new record.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for a blank name, negative stock or price,
    ///   or a threshold below 1
    /// - `UniqueViolation` when the name is taken
    pub async fn insert(&self, record: &InventoryRecord) -> DbResult<()> {
        validate_record(record)?;

        debug!(id = %record.id, name = %record.name, "Inserting inventory record");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, name, category, current_stock, min_stock, price_cents,
                status, is_active, last_restock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.category)
        .bind(record.current_stock)
        .bind(record.min_stock)
        .bind(record.price_cents)
        .bind(record.status())
        .bind(record.is_active)
        .bind(record.last_restock)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: record.name.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Gets a record by ID, active or retired.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a record by its exact (case-sensitive) name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Active records, by name.
    pub async fn list_active(&self) -> DbResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items WHERE is_active = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Active records currently classified as `status`.
    pub async fn list_by_status(&self, status: StockStatus) -> DbResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items \
             WHERE is_active = 1 AND status = ?1 ORDER BY current_stock, name"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Active records that need reordering (low or critical), most urgent first.
    pub async fn list_needing_reorder(&self) -> DbResult<Vec<InventoryRecord>> {
        let records = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items \
             WHERE is_active = 1 AND status IN ('critical', 'low') \
             ORDER BY CASE status WHEN 'critical' THEN 0 ELSE 1 END, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Number of active records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Writes a record's descriptive fields back: name, category, reorder
    /// threshold and price.
    ///
    /// `current_stock` is never taken from `record`. The stored count is
    /// re-read and the status re-derived from it, and the write only lands if
    /// the count is still the one read, so a sale committed in between is
    /// kept. Counted corrections go through [`Self::adjust_stock`].
    ///
    /// ## Returns
    /// The record as stored after the edit.
    pub async fn update(&self, record: &InventoryRecord) -> DbResult<InventoryRecord> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let stored = self.get_active(&record.id).await?;

            let updated = InventoryRecord {
                name: record.name.clone(),
                category: record.category,
                min_stock: record.min_stock,
                price_cents: record.price_cents,
                updated_at: record.updated_at,
                ..stored
            };
            validate_record(&updated)?;

            debug!(id = %updated.id, status = %updated.status(), "Updating inventory record");

            let result = sqlx::query(
                r#"
                UPDATE inventory_items SET
                    name = ?2,
                    category = ?3,
                    min_stock = ?4,
                    price_cents = ?5,
                    status = ?6,
                    updated_at = ?7
                WHERE id = ?1 AND current_stock = ?8 AND is_active = 1
                "#,
            )
            .bind(&updated.id)
            .bind(&updated.name)
            .bind(updated.category)
            .bind(updated.min_stock)
            .bind(updated.price_cents)
            .bind(updated.status())
            .bind(updated.updated_at)
            .bind(updated.current_stock)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(updated);
            }

            debug!(id = %record.id, attempt = attempt + 1, "Stock changed underneath edit, retrying");
        }

        Err(DbError::TransactionFailed(format!(
            "stock for {} kept changing during edit",
            record.id
        )))
    }

    /// Sets a record's on-hand count to a counted value.
    ///
    /// `expected_stock` is the count the correction was made against. If the
    /// stored count has moved since, nothing is written and
    /// `StockConflict` carries the count actually stored.
    pub async fn adjust_stock(
        &self,
        id: &str,
        expected_stock: i64,
        new_stock: i64,
        now: DateTime<Utc>,
    ) -> DbResult<InventoryRecord> {
        validate_stock(new_stock).map_err(kusina_core::CoreError::from)?;

        let stored = self.get_active(id).await?;
        if stored.current_stock != expected_stock {
            return Err(DbError::stock_conflict(id, expected_stock, stored.current_stock));
        }

        let adjusted = InventoryRecord {
            current_stock: new_stock,
            updated_at: now,
            ..stored
        };

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                current_stock = ?2, status = ?3, updated_at = ?4
            WHERE id = ?1 AND current_stock = ?5 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(adjusted.current_stock)
        .bind(adjusted.status())
        .bind(now)
        .bind(expected_stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let actual = self.get_active(id).await?.current_stock;
            return Err(DbError::stock_conflict(id, expected_stock, actual));
        }

        info!(id = %id, previous_stock = expected_stock, new_stock, "Stock count corrected");
        Ok(adjusted)
    }

    async fn get_active(&self, id: &str) -> DbResult<InventoryRecord> {
        self.get_by_id(id)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| DbError::not_found("InventoryItem", id))
    }

    /// Retires a record: stock goes to zero and it drops out of listings.
    ///
    /// Records are never hard-deleted; historical orders still name them.
    pub async fn retire(&self, id: &str, now: DateTime<Utc>) -> DbResult<InventoryRecord> {
        let mut record = self
            .get_by_id(id)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| DbError::not_found("InventoryItem", id))?;

        record.current_stock = 0;
        record.is_active = false;
        record.updated_at = now;

        sqlx::query(
            r#"
            UPDATE inventory_items SET
                current_stock = 0, status = ?2, is_active = 0, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(record.status())
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(id = %id, name = %record.name, "Inventory record retired");
        Ok(record)
    }

    // =========================================================================
    // Restock
    // =========================================================================

    /// Adds stock and appends a history entry in one transaction.
    ///
    /// ## Returns
    /// The updated record and the history entry written for it.
    pub async fn restock(
        &self,
        request: &RestockRequest,
        now: DateTime<Utc>,
    ) -> DbResult<(InventoryRecord, RestockHistoryEntry)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory_items WHERE id = ?1 AND is_active = 1"
        ))
        .bind(&request.inventory_item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("InventoryItem", &request.inventory_item_id))?;

        let entry = reconcile::restock(&mut record, request, now)?;

        sqlx::query(
            r#"
            UPDATE inventory_items SET
                current_stock = ?2, status = ?3, last_restock = ?4, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&record.id)
        .bind(record.current_stock)
        .bind(record.status())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "INSERT INTO restock_history ({HISTORY_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .bind(&entry.id)
        .bind(&entry.inventory_item_id)
        .bind(entry.quantity)
        .bind(entry.unit_cost_cents)
        .bind(entry.total_cost_cents)
        .bind(entry.previous_stock)
        .bind(entry.new_stock)
        .bind(&entry.operator_id)
        .bind(&entry.notes)
        .bind(entry.restocked_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %record.id,
            name = %record.name,
            quantity = entry.quantity,
            previous_stock = entry.previous_stock,
            new_stock = entry.new_stock,
            operator = %entry.operator_id,
            "Inventory restocked"
        );

        Ok((record, entry))
    }

    /// Restock history for a record, newest first.
    pub async fn history(&self, inventory_item_id: &str, limit: u32) -> DbResult<Vec<RestockHistoryEntry>> {
        let entries = sqlx::query_as::<_, RestockHistoryEntry>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM restock_history \
             WHERE inventory_item_id = ?1 ORDER BY restocked_at DESC, rowid DESC LIMIT ?2"
        ))
        .bind(inventory_item_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // =========================================================================
    // Sale Decrements
    // =========================================================================

    /// Decrements one record for a sale, clamping at zero.
    ///
    /// Uses compare-and-set on `current_stock` so two checkouts racing on
    /// the same record cannot lose an update; the loser re-reads and tries
    /// again.
    ///
    /// ## Returns
    /// * `Ok(Some(adjustment))` - Stock was decremented
    /// * `Ok(None)` - No active record with this ID
    pub async fn apply_sale(
        &self,
        inventory_item_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Option<StockAdjustment>> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let Some(mut record) = self
                .get_by_id(inventory_item_id)
                .await?
                .filter(|r| r.is_active)
            else {
                return Ok(None);
            };

            let adjustment = reconcile::apply_sale(&mut record, quantity, now);

            let result = sqlx::query(
                r#"
                UPDATE inventory_items SET
                    current_stock = ?2, status = ?3, updated_at = ?4
                WHERE id = ?1 AND current_stock = ?5 AND is_active = 1
                "#,
            )
            .bind(inventory_item_id)
            .bind(adjustment.new_stock)
            .bind(adjustment.new_status)
            .bind(now)
            .bind(adjustment.previous_stock)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(Some(adjustment));
            }

            debug!(
                id = %inventory_item_id,
                attempt = attempt + 1,
                "Stock changed underneath decrement, retrying"
            );
        }

        Err(DbError::TransactionFailed(format!(
            "stock for {inventory_item_id} kept changing during decrement"
        )))
    }

    /// Applies a completed order's lines to stored inventory.
    ///
    /// Each line stands alone: a missing reference, an unknown record or a
    /// failed write is recorded in the report and the next line proceeds.
    /// Only a non-completed order is an error.
    pub async fn reconcile_order(
        &self,
        order: &Order,
        now: DateTime<Utc>,
    ) -> DbResult<ReconciliationReport> {
        ensure_completed(order)?;

        let mut report = ReconciliationReport::default();

        for (index, line) in order.lines.iter().enumerate() {
            let id = match line_reference(line) {
                Ok(id) => id,
                Err(reason) => {
                    warn!(
                        order_number = %order.order_number,
                        line = index,
                        name = %line.name,
                        "Order line has no inventory reference, skipping"
                    );
                    report.skip(index, line, reason);
                    continue;
                }
            };

            match self.apply_sale(id, line.quantity, now).await {
                Ok(Some(adjustment)) => {
                    if adjustment.clamped {
                        warn!(
                            order_number = %order.order_number,
                            inventory_id = %id,
                            name = %adjustment.name,
                            previous_stock = adjustment.previous_stock,
                            quantity = line.quantity,
                            "Sale exceeded stock on hand, clamped to zero"
                        );
                    }
                    report.adjustments.push(adjustment);
                }
                Ok(None) => {
                    warn!(
                        order_number = %order.order_number,
                        line = index,
                        inventory_id = %id,
                        "Inventory record not found, skipping line"
                    );
                    report.skip(index, line, SkipReason::NotFound);
                }
                Err(e) => {
                    warn!(
                        order_number = %order.order_number,
                        line = index,
                        inventory_id = %id,
                        error = %e,
                        "Failed to decrement inventory, skipping line"
                    );
                    report.skip(index, line, SkipReason::StoreFailure(e.to_string()));
                }
            }
        }

        debug!(
            order_number = %order.order_number,
            adjusted = report.adjustments.len(),
            skipped = report.skipped.len(),
            "Order reconciled"
        );

        Ok(report)
    }
}

fn validate_record(record: &InventoryRecord) -> DbResult<()> {
    validate_item_name(&record.name).map_err(kusina_core::CoreError::from)?;
    validate_stock(record.current_stock).map_err(kusina_core::CoreError::from)?;
    validate_min_stock(record.min_stock).map_err(kusina_core::CoreError::from)?;
    validate_price_cents(record.price_cents).map_err(kusina_core::CoreError::from)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
