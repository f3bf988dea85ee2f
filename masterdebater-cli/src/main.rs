//! masterdebater CLI - operator tooling for the debate store
//!
//! This is the main entry point for the masterdebater command-line tool:
//! - Schema creation (`migrate`)
//! - Seed revision apply/revert/status (`seed up|down|status`)
//! - HTTP liveness server (`serve`)
//! - Shell completions (`completions`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use masterdebater_core::MasterDebaterConfig;

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "masterdebater",
    author,
    version,
    about = "Debate transcript store: schema, seed data and liveness server"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.masterdebater/config.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (GET /ping)
    Serve(commands::serve::ServeArgs),
    /// Create any missing tables and indexes
    Migrate(commands::migrate::MigrateArgs),
    /// Apply, revert or inspect the seed revision
    Seed(commands::seed::SeedArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return run_completions(args);
    }

    let mut config = MasterDebaterConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        default_level: config.log_level.clone(),
    })
    .ok();
    tracing::debug!(
        database = %config.database.url,
        bind = %config.server.bind,
        "Configuration resolved"
    );

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, &config.database).await?,
        Commands::Seed(args) => commands::run_seed(args, &config.database).await?,
        Commands::Completions(_) => {}
    }
    Ok(())
}

fn run_completions(args: &CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
