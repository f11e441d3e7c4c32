//! # Menu Repository
//!
//! Sellable catalog entries. A menu item may point at the inventory record
//! it draws stock from; several items can share one record.
//!
//! Retired items keep their row for order history. Every read here skips
//! them, so checkout sees a retired item as missing.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use kusina_core::validation::{validate_item_name, validate_price_cents, validate_unit};
use kusina_core::{Category, CoreError, MenuItem};

const MENU_COLUMNS: &str = "id, name, category, price_cents, available, vatable, unit, \
                            inventory_item_id, created_at, updated_at";

/// Repository for menu item operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Inserts a menu item.
    ///
    /// ## Errors
    /// - `ForeignKeyViolation` if `inventory_item_id` names no record
    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        validate_item(item)?;

        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(&format!(
            "INSERT INTO menu_items ({MENU_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ))
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(item.vatable)
        .bind(&item.unit)
        .bind(&item.inventory_item_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a menu item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Fetches several items at once, in no particular order.
    ///
    /// Missing IDs are simply absent from the result.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {MENU_COLUMNS} FROM menu_items WHERE id IN ({placeholders}) AND is_active = 1"
        );

        let mut query = sqlx::query_as::<_, MenuItem>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Lists the menu, optionally one category, by name.
    pub async fn list(&self, category: Option<Category>) -> DbResult<Vec<MenuItem>> {
        let items = match category {
            Some(category) => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {MENU_COLUMNS} FROM menu_items \
                     WHERE category = ?1 AND is_active = 1 ORDER BY name"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MenuItem>(&format!(
                    "SELECT {MENU_COLUMNS} FROM menu_items WHERE is_active = 1 ORDER BY category, name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(items)
    }

    /// Marks an item available or unavailable.
    pub async fn set_available(&self, id: &str, available: bool, now: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query("UPDATE menu_items SET available = ?2, updated_at = ?3 WHERE id = ?1 AND is_active = 1")
            .bind(id)
            .bind(available)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        debug!(id = %id, available, "Menu item availability changed");
        Ok(())
    }

    /// Changes an item's price. Past orders keep the price they were sold at.
    pub async fn set_price(&self, id: &str, price_cents: i64, now: DateTime<Utc>) -> DbResult<()> {
        validate_price_cents(price_cents).map_err(CoreError::from)?;

        let result = sqlx::query(
            "UPDATE menu_items SET price_cents = ?2, updated_at = ?3 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Writes every editable field of an active item back.
    ///
    /// ## Errors
    /// - `NotFound` if the item is missing or retired
    /// - `ForeignKeyViolation` if `inventory_item_id` names no record
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        validate_item(item)?;

        debug!(id = %item.id, name = %item.name, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                available = ?5,
                vatable = ?6,
                unit = ?7,
                inventory_item_id = ?8,
                updated_at = ?9
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(item.vatable)
        .bind(&item.unit)
        .bind(&item.inventory_item_id)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", &item.id));
        }

        Ok(())
    }

    /// Retires an item: it becomes unavailable and drops out of every read.
    /// The row stays so past orders still resolve.
    pub async fn retire(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE menu_items SET is_active = 0, available = 0, updated_at = ?2 \
             WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        info!(id = %id, "Menu item retired");
        Ok(())
    }

    /// Active items only.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn validate_item(item: &MenuItem) -> DbResult<()> {
    validate_item_name(&item.name).map_err(CoreError::from)?;
    validate_price_cents(item.price_cents).map_err(CoreError::from)?;
    validate_unit(&item.unit).map_err(CoreError::from)?;
    Ok(())
}
