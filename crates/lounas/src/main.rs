// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! lounasbot - posts the day's lunch menus to Slack and tallies votes.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod prefetch;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lounas_config::{ConfigError, LounasConfig};

/// lounasbot - lunch menus for Slack.
#[derive(Parser, Debug)]
#[command(name = "lounas", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot: Slack endpoint, prefetch and message removal.
    Serve,
    /// Validate the configuration and print a summary.
    CheckConfig,
    /// Fetch today's menus once and print what would be posted.
    Prefetch,
}

fn load(path: Option<&PathBuf>) -> Result<LounasConfig, Vec<ConfigError>> {
    match path {
        Some(path) => lounas_config::load_and_validate_path(path),
        None => lounas_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            lounas_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::CheckConfig) => {
            check::run_check_config(&config);
            Ok(())
        }
        Some(Commands::Prefetch) => prefetch::run_prefetch(&config).await,
        None => {
            println!("lounas: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("lounas: {e}");
        std::process::exit(1);
    }
}
