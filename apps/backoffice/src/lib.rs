//! # Kusina Back Office
//!
//! Orchestration layer for the Kusina outlet: checkout, inventory, menu and
//! dashboard services over the shared application state.
//!
//! ## Module Organization
//! ```text
//! kusina_backoffice/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (db, dispatcher, calculator, aggregator)
//! │   └── config.rs   ◄─── AppConfig (TOML + KUSINA_* overrides)
//! ├── services/
//! │   ├── checkout.rs ◄─── settle, persist, reconcile, fold, notify
//! │   ├── inventory.rs◄─── records, restock, low-stock views
//! │   ├── menu.rs     ◄─── menu items
//! │   ├── dashboard.rs◄─── summary for the initial render
//! │   └── stats.rs    ◄─── daily stats writes (internal)
//! └── error.rs        ◄─── ServiceError returned by every service
//! ```

pub mod error;
pub mod services;
pub mod state;

use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kusina_notify::{encode, observe_with_reconnect, ReconnectPolicy};

use state::{AppConfig, AppState};

/// Runs the back office until Ctrl-C.
///
/// ## Startup Sequence
/// 1. Load configuration (defaults, file, environment)
/// 2. Open the database and run migrations
/// 3. Wire application state
/// 4. Attach the event log observer
/// 5. Wait for shutdown
pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Kusina back office");

    let config = AppConfig::load_or_default(config_path);
    let policy = ReconnectPolicy::from_config(&config.notify);
    let state = AppState::open(config).await?;

    info!(
        store = %state.config.store.name,
        inventory_items = state.db.inventory().count().await?,
        menu_items = state.db.menu().count().await?,
        "State initialized"
    );

    let dispatcher = state.dispatcher.clone();
    let observer = tokio::spawn(async move {
        observe_with_reconnect(
            &policy,
            move || {
                let dispatcher = dispatcher.clone();
                async move { Ok(dispatcher.subscribe()) }
            },
            |event| match encode(&event) {
                Ok(json) => info!(kind = event.kind(), %json, "Dashboard event"),
                Err(e) => warn!(kind = event.kind(), error = %e, "Failed to encode event"),
            },
        )
        .await
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    observer.abort();
    state.db.close().await;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kusina=trace` - Show trace for kusina crates only
/// - Default: `info,kusina=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kusina=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
