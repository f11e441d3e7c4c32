//! # Seed Data Generator
//!
//! Populates the database with the outlet's starter catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p kusina-db --bin seed
//!
//! # Specify database path
//! cargo run -p kusina-db --bin seed -- --db ./data/kusina.db
//! ```
//!
//! Each catalog row becomes one inventory record plus one menu item that
//! draws from it. Stock levels are staggered so the dashboard shows every
//! status on a fresh database.

use chrono::Utc;
use std::env;
use kusina_core::{Category, InventoryRecord, MenuItem};
use kusina_db::{Database, DbConfig};
use uuid::Uuid;

/// (name, category, price in pesos, starting stock, reorder threshold)
const CATALOG: &[(&str, Category, i64, i64, i64)] = &[
    ("Korean Spicy Bulgogi (Pork)", Category::RiceBowlMeals, 158, 40, 10),
    ("Crispy Pork Lechon Kawali", Category::RiceBowlMeals, 158, 35, 10),
    ("Buttered Honey Chicken", Category::RiceBowlMeals, 128, 6, 10),
    ("Chicken Adobo", Category::RiceBowlMeals, 128, 50, 10),
    ("Sizzling Pork Sisig", Category::HotSizzlers, 168, 30, 10),
    ("Sizzling Liempo", Category::HotSizzlers, 168, 2, 10),
    ("Sizzling Porkchop", Category::HotSizzlers, 148, 25, 10),
    ("Pancit Bihon (M)", Category::PartyTray, 500, 8, 3),
    ("Spaghetti (L)", Category::PartyTray, 1000, 0, 2),
    ("Cucumber Lemonade (Glass)", Category::Drinks, 38, 80, 20),
    ("Red Tea (Glass)", Category::Drinks, 38, 12, 20),
    ("Soda (Mismo)", Category::Drinks, 28, 60, 24),
    ("Cafe Americano Tall", Category::Coffee, 88, 40, 15),
    ("Cafe Latte Grande", Category::Coffee, 128, 40, 15),
    ("Caramel Macchiato Tall", Category::Coffee, 108, 4, 15),
    ("Milk Tea Regular HC", Category::MilkTea, 68, 50, 20),
    ("Matcha Green Tea MC", Category::MilkTea, 88, 30, 20),
    ("Cookies and Cream Frappe", Category::Frappe, 118, 25, 10),
    ("Mocha Frappe", Category::Frappe, 118, 25, 10),
    ("Cheesy Fries", Category::SnacksAndAppetizer, 98, 30, 10),
    ("Lumpiang Shanghai (6 pcs)", Category::SnacksAndAppetizer, 88, 30, 10),
    ("Tapsilog", Category::BudgetMeals, 99, 45, 15),
    ("Longsilog", Category::BudgetMeals, 89, 45, 15),
    ("Kare-Kare", Category::Specialties, 248, 15, 5),
    ("Crispy Pata", Category::Specialties, 398, 10, 5),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kusina_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kusina Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kusina_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kusina Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} inventory records", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut seeded = 0;
    for (name, category, pesos, stock, min_stock) in CATALOG {
        let now = Utc::now();
        let price_cents = pesos * 100;

        let record = InventoryRecord::new(*name, *category, *stock, *min_stock, price_cents, now);
        if let Err(e) = db.inventory().insert(&record).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }

        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: *category,
            price_cents,
            available: true,
            vatable: true,
            unit: category.default_unit().to_string(),
            inventory_item_id: Some(record.id.clone()),
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = db.menu().insert(&item).await {
            eprintln!("Failed to insert menu item {}: {}", name, e);
            continue;
        }

        println!("  {:<32} {:>4} on hand  [{}]", name, stock, record.status());
        seeded += 1;
    }

    let reorder = db.inventory().list_needing_reorder().await?;

    println!();
    println!("✓ Seeded {} catalog entries", seeded);
    println!("  {} records already need reordering", reorder.len());

    Ok(())
}
