//! Tracing setup for the masterdebater CLI
//!
//! Usage:
//!   masterdebater --debug ...                      # Debug logging to console
//!   RUST_LOG=masterdebater_server=trace masterdebater  # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                                       # Log filter (default: info)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the filter to debug if RUST_LOG is not set)
    pub debug: bool,
    /// Fallback level from the config file's `log_level`
    pub default_level: Option<String>,
}

impl TracingConfig {
    fn fallback_filter(&self) -> EnvFilter {
        if self.debug {
            return EnvFilter::new("debug");
        }
        let level = self.default_level.as_deref().unwrap_or("info");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize console tracing. RUST_LOG always wins when set.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.fallback_filter());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
