//! HTTP server command
//!
//! Builds the session factory, then serves until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use masterdebater_core::MasterDebaterConfig;
use masterdebater_server::http::{run_server, ServerConfig};

use super::open_database;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config/MASTERDEBATER_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &MasterDebaterConfig) -> Result<()> {
    let mut server = ServerConfig::from_section(&config.server).context("Invalid [server] config")?;
    if let Some(bind) = args.bind {
        server.bind_addr = bind;
    }
    server.cors_permissive |= args.cors_permissive;

    tracing::info!("Starting masterdebater server on {}", server.bind_addr);

    let db = open_database(&config.database).await?;

    // Blocks until shutdown
    run_server(db, server).await.context("Server error")?;

    Ok(())
}
