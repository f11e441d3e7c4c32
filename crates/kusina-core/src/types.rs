//! # Domain Types
//!
//! Core domain types used throughout the Kusina back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ InventoryRecord  │◄──│    MenuItem      │   │      Order       │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  name (unique)   │   │  price_cents     │   │  order_number    │    │
//! │  │  current_stock   │   │  vatable         │   │  lines[]  ───────┼──┐ │
//! │  │  min_stock       │   │  available       │   │  totals, payment │  │ │
//! │  │  status()        │   │  inventory ref ──┘   │  order_type      │  │ │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘  │ │
//! │           ▲                                                           │ │
//! │           │              ┌──────────────────┐                         │ │
//! │           └──────────────│    OrderLine     │◄────────────────────────┘ │
//! │        inventory ref     │  name/price snap │                           │
//! │                          └──────────────────┘                           │
//! │                                                                         │
//! │  RestockHistoryEntry ── append-only log of stock increases              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Is Derived
//! [`InventoryRecord`] carries no status field. [`InventoryRecord::status`]
//! computes it from the stock columns every time, so the two can never
//! disagree in memory. The database keeps a cached `status` column for the
//! low-stock queries, written only from this accessor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::stock::{classify, StockStatus};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%; Philippine VAT is 1200 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_VAT_RATE_BPS)
    }
}

// =============================================================================
// Category
// =============================================================================

/// Catalog category shared by inventory records and menu items.
///
/// The display strings are the wire and database form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Category {
    #[serde(rename = "Rice Bowl Meals")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Rice Bowl Meals"))]
    RiceBowlMeals,
    #[serde(rename = "Hot Sizzlers")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Hot Sizzlers"))]
    HotSizzlers,
    #[serde(rename = "Party Tray")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Party Tray"))]
    PartyTray,
    #[serde(rename = "Drinks")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Drinks"))]
    Drinks,
    #[serde(rename = "Coffee")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Coffee"))]
    Coffee,
    #[serde(rename = "Milk Tea")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Milk Tea"))]
    MilkTea,
    #[serde(rename = "Frappe")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Frappe"))]
    Frappe,
    #[serde(rename = "Snacks & Appetizer")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Snacks & Appetizer"))]
    SnacksAndAppetizer,
    #[serde(rename = "Budget Meals Served with Rice")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Budget Meals Served with Rice"))]
    BudgetMeals,
    #[serde(rename = "Specialties")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Specialties"))]
    Specialties,
}

impl Category {
    /// Every category, in menu board order.
    pub const ALL: [Category; 10] = [
        Category::RiceBowlMeals,
        Category::HotSizzlers,
        Category::PartyTray,
        Category::Drinks,
        Category::Coffee,
        Category::MilkTea,
        Category::Frappe,
        Category::SnacksAndAppetizer,
        Category::BudgetMeals,
        Category::Specialties,
    ];

    /// Display / wire form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::RiceBowlMeals => "Rice Bowl Meals",
            Category::HotSizzlers => "Hot Sizzlers",
            Category::PartyTray => "Party Tray",
            Category::Drinks => "Drinks",
            Category::Coffee => "Coffee",
            Category::MilkTea => "Milk Tea",
            Category::Frappe => "Frappe",
            Category::SnacksAndAppetizer => "Snacks & Appetizer",
            Category::BudgetMeals => "Budget Meals Served with Rice",
            Category::Specialties => "Specialties",
        }
    }

    /// Unit label a new menu item in this category is sold by.
    pub const fn default_unit(&self) -> &'static str {
        match self {
            Category::PartyTray => "tray",
            Category::Drinks | Category::Coffee | Category::MilkTea | Category::Frappe => "cup",
            _ => "order",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Order Enums
// =============================================================================

/// How the customer pays. `Gcash` is the e-wallet option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash at the counter.
    Cash,
    /// GCash e-wallet transfer.
    Gcash,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Gcash => "gcash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "gcash" => Ok(PaymentMethod::Gcash),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["cash".to_string(), "gcash".to_string()],
            }),
        }
    }
}

/// Dine-in or take-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OrderType {
    #[serde(rename = "Dine In")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Dine In"))]
    DineIn,
    #[serde(rename = "Take Out")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Take Out"))]
    TakeOut,
}

/// Kitchen lifecycle of an order.
///
/// Checkout writes orders straight into `Completed`; the other states are
/// kept for the kitchen display flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Inventory Record
// =============================================================================

/// A stocked item: a raw ingredient or a sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Case-sensitive identity key, unique across inventory.
    pub name: String,

    pub category: Category,

    /// On-hand quantity, never negative.
    pub current_stock: i64,

    /// Reorder threshold, at least 1.
    pub min_stock: i64,

    /// Unit value in centavos, used for the inventory value gauge.
    pub price_cents: i64,

    /// Retired records stay for history but drop out of listings.
    pub is_active: bool,

    #[ts(as = "Option<String>")]
    pub last_restock: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Builds a fresh, active record with no restock history.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        current_stock: i64,
        min_stock: i64,
        price_cents: i64,
        now: DateTime<Utc>,
    ) -> Self {
        InventoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            current_stock,
            min_stock,
            price_cents,
            is_active: true,
            last_restock: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stock status derived from the current counts.
    #[inline]
    pub fn status(&self) -> StockStatus {
        classify(self.current_stock, self.min_stock)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// On-hand value: stock × unit price.
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.current_stock.max(0))
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable catalog entry.
///
/// Several menu items may draw from the same inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price_cents: i64,
    /// Unavailable items cannot be rung up.
    pub available: bool,
    /// Whether VAT applies to this item.
    pub vatable: bool,
    /// What one unit is ("cup", "tray", ...).
    pub unit: String,
    pub inventory_item_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Freezes this item into an order line.
    ///
    /// Name, price, category, VAT flag and inventory reference are copied
    /// so later menu edits never rewrite sales history.
    pub fn to_order_line(&self, quantity: i64) -> OrderLine {
        OrderLine {
            id: uuid::Uuid::new_v4().to_string(),
            menu_item_id: Some(self.id.clone()),
            inventory_item_id: self.inventory_item_id.clone(),
            name: self.name.clone(),
            category: Some(self.category),
            unit_price_cents: self.price_cents,
            quantity,
            vatable: self.vatable,
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

fn default_vatable() -> bool {
    true
}

/// One entry in an order. Immutable once the order completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub menu_item_id: Option<String>,
    pub inventory_item_id: Option<String>,
    /// Name at time of sale (frozen).
    pub name: String,
    /// Category at time of sale (frozen); drives category statistics.
    pub category: Option<Category>,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// Lines without an explicit flag are taxed.
    #[serde(default = "default_vatable")]
    pub vatable: bool,
}

impl OrderLine {
    /// A vatable line with no catalog references.
    pub fn new(name: impl Into<String>, unit_price_cents: i64, quantity: i64) -> Self {
        OrderLine {
            id: uuid::Uuid::new_v4().to_string(),
            menu_item_id: None,
            inventory_item_id: None,
            name: name.into(),
            category: None,
            unit_price_cents,
            quantity,
            vatable: default_vatable(),
        }
    }

    pub fn with_inventory(mut self, inventory_item_id: impl Into<String>) -> Self {
        self.inventory_item_id = Some(inventory_item_id.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_vatable(mut self, vatable: bool) -> Self {
        self.vatable = vatable;
        self
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A settled transaction.
///
/// Once `status` is `Completed` the record is append-only: totals, lines
/// and payment are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Human-readable `ORD-YYYYMMDD-NNN`, unique per business day.
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub amount_paid_cents: i64,
    pub change_cents: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line quantities.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

/// Formats an order number: `ORD-YYYYMMDD-NNN`.
///
/// `sequence` is 1-based within the business day and is zero-padded to
/// three digits; the 1000th order of a day simply widens to four.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kusina_core::types::format_order_number;
///
/// let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// assert_eq!(format_order_number(day, 7), "ORD-20250314-007");
/// ```
pub fn format_order_number(business_day: NaiveDate, sequence: u32) -> String {
    format!("ORD-{}-{:03}", business_day.format("%Y%m%d"), sequence)
}

// =============================================================================
// Restocking
// =============================================================================

/// Admin request to add stock to an inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestockRequest {
    pub inventory_item_id: String,
    pub quantity: i64,
    /// Total paid for the delivery, in centavos.
    pub total_cost_cents: i64,
    /// Who received the delivery.
    pub operator_id: String,
    pub notes: Option<String>,
}

/// Immutable record of one restock. History is insert-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RestockHistoryEntry {
    pub id: String,
    pub inventory_item_id: String,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub total_cost_cents: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub operator_id: String,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub restocked_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
