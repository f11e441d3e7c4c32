//! # Kusina Back Office Entry Point
//!
//! ```text
//! kusina-backoffice [CONFIG]
//! ```
//!
//! The config path may also come from `KUSINA_CONFIG`. Without either, the
//! platform config directory is used, then built-in defaults.

use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    kusina_backoffice::init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KUSINA_CONFIG").ok())
        .map(PathBuf::from);

    kusina_backoffice::run(config_path).await
}
