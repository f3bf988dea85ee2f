//! Seed migration commands (up, down, status)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use masterdebater_core::DatabaseConfig;
use masterdebater_server::db::{schema, seed};

use super::open_database;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Subcommand, Debug)]
pub enum SeedCommand {
    /// Apply the seed revision (creates the schema first if missing)
    Up,
    /// Revert the seed revision
    Down,
    /// Show whether the seed is applied and per-table row counts
    Status {
        /// Print status as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_seed(args: SeedArgs, config: &DatabaseConfig) -> Result<()> {
    let db = open_database(config).await?;

    match args.command {
        SeedCommand::Up => {
            schema::create_all(&db)
                .await
                .context("Failed to create schema")?;
            let report = seed::upgrade(&db)
                .await
                .with_context(|| format!("Failed to apply seed revision {}", seed_revision()))?;
            println!(
                "Applied {}: {} formats, {} phases, {} criteria, {} LLM configs, {} users",
                seed_revision(),
                report.formats,
                report.phases,
                report.criteria,
                report.llm_configs,
                report.users
            );
        }
        SeedCommand::Down => {
            let report = seed::downgrade(&db)
                .await
                .with_context(|| format!("Failed to revert seed revision {}", seed_revision()))?;
            println!(
                "Reverted {}: removed {} formats, {} phases, {} criteria, {} LLM configs, {} users",
                seed_revision(),
                report.formats,
                report.phases,
                report.criteria,
                report.llm_configs,
                report.users
            );
        }
        SeedCommand::Status { json } => {
            let status = seed::status(&db)
                .await
                .context("Failed to read seed status (has `migrate` been run?)")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                match status.applied_at {
                    Some(at) => println!("{}: applied at {}", status.revision, at),
                    None => println!("{}: not applied", status.revision),
                }
                for (table, rows) in &status.row_counts {
                    println!("  {:<22} {}", table, rows);
                }
            }
        }
    }

    db.close().await;
    Ok(())
}

fn seed_revision() -> &'static str {
    masterdebater_core::seed::SEED_REVISION
}
