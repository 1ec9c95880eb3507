//! Shared utilities for commands
//!
//! This module contains:
//! - `open_config` - Load and validate configuration
//! - `open_statement` - Parse and categorize a statement CSV
//! - `read_known` / `write_known` - Known-set JSON files

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use sift_core::{config, import::process_statement, CategorizedBatch, Config, Transaction};

/// Load configuration from --config, the data dir override, or built-in defaults
pub fn open_config(config_path: Option<&Path>) -> Result<Config> {
    config::load_config(config_path).context("Failed to load config")
}

/// Parse and categorize one statement file
pub fn open_statement(file: &Path) -> Result<CategorizedBatch> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    process_statement(csv_file)
        .with_context(|| format!("Failed to parse statement: {}", file.display()))
}

/// Read a JSON array of previously stored transactions
pub fn read_known(path: &Path) -> Result<CategorizedBatch> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read known transactions: {}", path.display()))?;
    let transactions: Vec<Transaction> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid known transactions file: {}", path.display()))?;

    for tx in &transactions {
        tx.validate()
            .with_context(|| format!("Invalid transaction '{}' in {}", tx.memo, path.display()))?;
    }

    Ok(CategorizedBatch::from_transactions(transactions))
}

/// Read the known set if a path was given, otherwise start empty
pub fn read_known_opt(path: Option<&Path>) -> Result<CategorizedBatch> {
    match path {
        Some(path) => read_known(path),
        None => Ok(CategorizedBatch::default()),
    }
}

/// Write transactions as a JSON array
pub fn write_known(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string_pretty(transactions)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
