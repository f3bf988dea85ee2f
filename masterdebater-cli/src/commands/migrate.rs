//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use masterdebater_core::DatabaseConfig;
use masterdebater_server::db::schema;

use super::open_database;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Drop every table first, discarding all data
    #[arg(long)]
    pub recreate: bool,
}

/// Create any missing tables and indexes
pub async fn run_migrate(args: MigrateArgs, config: &DatabaseConfig) -> Result<()> {
    let db = open_database(config).await?;

    if args.recreate {
        tracing::warn!("Dropping all tables before migrating");
        schema::drop_all(&db).await.context("Failed to drop schema")?;
    }

    schema::create_all(&db)
        .await
        .context("Failed to create schema")?;
    db.close().await;

    println!("Schema ready ({} tables)", schema::TABLES.len());
    Ok(())
}
