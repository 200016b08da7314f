//! Asset linker CLI
//!
//! Copies project assets into the native Android and iOS projects and keeps
//! their resource descriptors in sync.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    asset_platforms::logging::init(level).map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");

    commands::run_link(&cli).await
}
