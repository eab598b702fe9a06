//! CalMirror - calendar mirror command-line entry point
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calmirror_infra::config;
use calmirror_infra::observability::init_logging;
use calmirror_lib::commands::{self, FailureReport};
use calmirror_lib::AppContext;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "calmirror", version, about = "Mirror a Microsoft 365 calendar into a local store")]
struct Cli {
    /// Configuration file (TOML or JSON). Defaults to searching standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one reconciliation for a user.
    Sync {
        #[arg(long)]
        user: String,
    },
    /// Show the stored sync state for a user.
    Status {
        #[arg(long)]
        user: String,
    },
    /// Store a refresh token for a user.
    Link {
        #[arg(long)]
        user: String,
        #[arg(long, env = "CALMIRROR_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    init_logging(config.log_level, cli.json_logs).context("failed to initialize logging")?;

    let ctx = AppContext::new(config).context("failed to initialize application")?;

    match cli.command {
        Command::Sync { user } => match commands::sync(&ctx, &user).await {
            Ok(summary) => print_json(&summary),
            Err(err) => {
                print_json(&FailureReport::from(&err))?;
                Err(err).context("calendar sync failed")
            }
        },
        Command::Status { user } => print_json(&commands::status(&ctx, &user).await?),
        Command::Link { user, refresh_token } => {
            print_json(&commands::link(&ctx, &user, &refresh_token)?)
        }
    }
}
