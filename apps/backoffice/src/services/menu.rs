//! # Menu Service

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use kusina_core::{Category, MenuItem};

use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: String,
    pub category: Category,
    pub price_cents: i64,
    #[serde(default = "default_vatable")]
    pub vatable: bool,
    /// Defaults to the category's usual unit.
    #[serde(default)]
    pub unit: Option<String>,
    /// Stock this item sells from, if tracked.
    #[serde(default)]
    pub inventory_item_id: Option<String>,
}

fn default_vatable() -> bool {
    true
}

/// Full edit. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price_cents: Option<i64>,
    pub vatable: Option<bool>,
    pub unit: Option<String>,
    /// Links the item to this inventory record.
    pub inventory_item_id: Option<String>,
    /// Drops the inventory link. Ignored when `inventory_item_id` is set.
    #[serde(default)]
    pub unlink_inventory: bool,
}

/// Adds an item to the menu, available immediately.
pub async fn create_menu_item(state: &AppState, new: NewMenuItem) -> Result<MenuItem, ServiceError> {
    debug!(name = %new.name, "create_menu_item");

    if let Some(id) = &new.inventory_item_id {
        ensure_active_inventory(state, id).await?;
    }

    let unit = match new.unit.as_deref().map(str::trim) {
        Some(unit) if !unit.is_empty() => unit.to_string(),
        _ => new.category.default_unit().to_string(),
    };

    let now = Utc::now();
    let item = MenuItem {
        id: Uuid::new_v4().to_string(),
        name: new.name.trim().to_string(),
        category: new.category,
        price_cents: new.price_cents,
        available: true,
        vatable: new.vatable,
        unit,
        inventory_item_id: new.inventory_item_id,
        created_at: now,
        updated_at: now,
    };

    state.db.menu().insert(&item).await?;

    info!(id = %item.id, name = %item.name, price = %item.price(), "Menu item created");
    Ok(item)
}

/// Applies a full or partial edit. Past orders keep their frozen copy.
pub async fn update_menu_item(
    state: &AppState,
    id: &str,
    update: MenuUpdate,
) -> Result<MenuItem, ServiceError> {
    let mut item = state
        .db
        .menu()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Menu item", id))?;

    if let Some(name) = update.name {
        item.name = name.trim().to_string();
    }
    if let Some(category) = update.category {
        item.category = category;
    }
    if let Some(price_cents) = update.price_cents {
        item.price_cents = price_cents;
    }
    if let Some(vatable) = update.vatable {
        item.vatable = vatable;
    }
    if let Some(unit) = update.unit {
        item.unit = unit.trim().to_string();
    }
    match update.inventory_item_id {
        Some(inventory_id) => {
            ensure_active_inventory(state, &inventory_id).await?;
            item.inventory_item_id = Some(inventory_id);
        }
        None if update.unlink_inventory => item.inventory_item_id = None,
        None => {}
    }

    item.updated_at = Utc::now();
    state.db.menu().update(&item).await?;

    info!(id = %item.id, name = %item.name, price = %item.price(), "Menu item updated");
    Ok(item)
}

/// Takes an item off the menu for good. Its row stays for order history.
pub async fn retire_menu_item(state: &AppState, id: &str) -> Result<(), ServiceError> {
    state.db.menu().retire(id, Utc::now()).await?;
    Ok(())
}

/// Every category, in display order.
pub fn list_categories() -> &'static [Category] {
    &Category::ALL
}

async fn ensure_active_inventory(state: &AppState, id: &str) -> Result<(), ServiceError> {
    match state.db.inventory().get_by_id(id).await? {
        Some(record) if record.is_active => Ok(()),
        _ => Err(ServiceError::not_found("Inventory item", id)),
    }
}

pub async fn set_availability(state: &AppState, id: &str, available: bool) -> Result<(), ServiceError> {
    state.db.menu().set_available(id, available, Utc::now()).await?;
    info!(id = %id, available, "Menu item availability changed");
    Ok(())
}

/// Reprices an item. Past orders keep the price they were sold at.
pub async fn set_price(state: &AppState, id: &str, price_cents: i64) -> Result<(), ServiceError> {
    state.db.menu().set_price(id, price_cents, Utc::now()).await?;
    info!(id = %id, price_cents, "Menu item repriced");
    Ok(())
}

pub async fn list_menu(state: &AppState, category: Option<Category>) -> Result<Vec<MenuItem>, ServiceError> {
    Ok(state.db.menu().list(category).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn new_item(name: &str, price_cents: i64) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            category: Category::Coffee,
            price_cents,
            vatable: true,
            unit: None,
            inventory_item_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let state = AppState::in_memory().await;
        create_menu_item(&state, new_item("Cafe Latte Tall", 10800)).await.unwrap();
        create_menu_item(&state, new_item("Cafe Americano Tall", 8800)).await.unwrap();

        assert_eq!(list_menu(&state, Some(Category::Coffee)).await.unwrap().len(), 2);
        assert!(list_menu(&state, Some(Category::Frappe)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unit_defaults_by_category() {
        let state = AppState::in_memory().await;
        let latte = create_menu_item(&state, new_item("Spanish Latte", 11800)).await.unwrap();
        assert_eq!(latte.unit, "cup");

        let mut tray = new_item("Pancit Bihon (L)", 45000);
        tray.category = Category::PartyTray;
        tray.unit = Some(" platter ".to_string());
        let tray = create_menu_item(&state, tray).await.unwrap();
        assert_eq!(tray.unit, "platter");
    }

    #[tokio::test]
    async fn test_unknown_inventory_reference_rejected() {
        let state = AppState::in_memory().await;
        let mut item = new_item("Caramel Macchiato", 10800);
        item.inventory_item_id = Some(Uuid::new_v4().to_string());

        let err = create_menu_item(&state, item).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let state = AppState::in_memory().await;
        let err = create_menu_item(&state, new_item("Free Refill", -1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_full_edit() {
        let state = AppState::in_memory().await;
        let beans = state_inventory(&state, "Espresso Beans").await;
        let item = create_menu_item(&state, new_item("Iced Mocha", 12800)).await.unwrap();

        let updated = update_menu_item(
            &state,
            &item.id,
            MenuUpdate {
                name: Some(" Iced White Mocha ".to_string()),
                category: Some(Category::Frappe),
                price_cents: Some(13800),
                vatable: Some(false),
                unit: Some("venti".to_string()),
                inventory_item_id: Some(beans.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Iced White Mocha");

        let stored = state.db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(stored.category, Category::Frappe);
        assert_eq!(stored.price_cents, 13800);
        assert!(!stored.vatable);
        assert_eq!(stored.unit, "venti");
        assert_eq!(stored.inventory_item_id, Some(beans));

        update_menu_item(
            &state,
            &item.id,
            MenuUpdate {
                unlink_inventory: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let stored = state.db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert!(stored.inventory_item_id.is_none());
        assert_eq!(stored.price_cents, 13800);
    }

    #[tokio::test]
    async fn test_edit_validates_fields() {
        let state = AppState::in_memory().await;
        let item = create_menu_item(&state, new_item("Hot Choco", 9800)).await.unwrap();

        for update in [
            MenuUpdate {
                name: Some("  ".to_string()),
                ..Default::default()
            },
            MenuUpdate {
                price_cents: Some(-5),
                ..Default::default()
            },
            MenuUpdate {
                unit: Some(String::new()),
                ..Default::default()
            },
        ] {
            let err = update_menu_item(&state, &item.id, update).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }

        let err = update_menu_item(
            &state,
            &item.id,
            MenuUpdate {
                inventory_item_id: Some(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let stored = state.db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Hot Choco");
    }

    #[tokio::test]
    async fn test_retire_removes_from_menu() {
        let state = AppState::in_memory().await;
        let item = create_menu_item(&state, new_item("Seasonal Latte", 12800)).await.unwrap();

        retire_menu_item(&state, &item.id).await.unwrap();

        assert!(list_menu(&state, None).await.unwrap().is_empty());
        let err = update_menu_item(&state, &item.id, MenuUpdate::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = retire_menu_item(&state, &item.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_list_categories() {
        let categories = list_categories();
        assert_eq!(categories.len(), 10);
        assert!(categories.contains(&Category::PartyTray));
    }

    async fn state_inventory(state: &AppState, name: &str) -> String {
        let record = kusina_core::InventoryRecord::new(name, Category::Coffee, 20, 5, 0, Utc::now());
        state.db.inventory().insert(&record).await.unwrap();
        record.id
    }

    #[tokio::test]
    async fn test_reprice_and_toggle() {
        let state = AppState::in_memory().await;
        let item = create_menu_item(&state, new_item("Mocha", 11800)).await.unwrap();

        set_price(&state, &item.id, 12800).await.unwrap();
        set_availability(&state, &item.id, false).await.unwrap();

        let stored = state.db.menu().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 12800);
        assert!(!stored.available);
    }
}
