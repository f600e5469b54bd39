//! compose-sync: reconcile a git repository of compose projects with a
//! remote orchestration API.
//!
//! # Usage
//!
//! ```text
//! compose-sync [--config <file>] run [--dry-run]
//! compose-sync [--config <file>] status [--json]
//! ```
//!
//! Settings come from environment variables (`COMPOSE_REPO_PATH`,
//! `ARCANE_BASE_URL`, `ARCANE_API_KEY`, ...), optionally layered over a YAML
//! file given with `--config`.

mod commands;
mod log_rotation;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{run::RunArgs, status::StatusArgs};
use compose_sync_core::{Config, ConfigFile};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "compose-sync",
    version,
    about = "Reconcile compose projects in a git checkout with a remote orchestration API",
    long_about = None,
)]
struct Cli {
    /// YAML file with settings; environment variables take precedence.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one reconciliation pass.
    Run(RunArgs),

    /// Show branch state and how each project stands remotely.
    Status(StatusArgs),
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let file = match path {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => ConfigFile::default(),
    };
    Config::from_env(file).context("invalid configuration")
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // JSON output owns stdout.
    let console = !matches!(&cli.command, Commands::Status(args) if args.json);
    logging::init(&config.log_file, console)?;
    tracing::debug!(?config, "loaded configuration");
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let result = match cli.command {
        Commands::Run(args) => args.run(&config),
        Commands::Status(args) => args.run(&config),
    };
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "compose-sync failed");
    }
    result
}
