//! Command implementations for the masterdebater CLI

pub mod migrate;
pub mod seed;
pub mod serve;

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

use anyhow::{Context, Result};
use masterdebater_core::DatabaseConfig;
use masterdebater_server::Database;

/// Open the store named by the resolved config.
pub(crate) async fn open_database(config: &DatabaseConfig) -> Result<Database> {
    Database::connect(config)
        .await
        .with_context(|| format!("Failed to open database at {}", config.url))
}
