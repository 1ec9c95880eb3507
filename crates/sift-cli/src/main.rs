//! Sift CLI - Statement deduplication and recurring payment finder
//!
//! Usage:
//!   sift analyze jan.csv feb.csv mar.csv    Find consistent bills and income
//!   sift dedup --file statement.csv         Remove duplicate outgoings
//!   sift normalize "MEMO TEXT"              Show the extracted label
//!   sift compare "LABEL A" "LABEL B"        Show the name similarity

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            files,
            known,
            json,
            top,
        } => commands::cmd_analyze(config_path, &files, known.as_deref(), json, top),
        Commands::Dedup {
            file,
            known,
            category,
            save,
        } => commands::cmd_dedup(
            config_path,
            &file,
            known.as_deref(),
            &category,
            save.as_deref(),
        ),
        Commands::Normalize { memo } => commands::cmd_normalize(&memo),
        Commands::Compare { a, b } => commands::cmd_compare(config_path, &a, &b),
    }
}
