//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sift - Find the bills and income that recur across your statements
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Bank statement deduplication and recurring payment finder", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/sift/config/sift.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze statements, one CSV per month in date order
    Analyze {
        /// Statement CSV files, oldest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSON file of previously stored transactions to dedupe against
        #[arg(short, long)]
        known: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Number of outgoings and income sources to list
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Remove duplicates from one statement
    Dedup {
        /// Statement CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// JSON file of previously stored transactions to dedupe against
        #[arg(short, long)]
        known: Option<PathBuf>,

        /// Category to dedupe: outgoing, purchase, income
        #[arg(short, long, default_value = "outgoing")]
        category: String,

        /// Write the known set plus accepted transactions to this JSON file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show the label extracted from a statement memo
    Normalize {
        /// Memo text, e.g. "TESCO STORES 3041 ON 12 MAR BCC"
        memo: String,
    },

    /// Compare two labels with the duplicate name check
    Compare {
        /// First label or memo
        a: String,

        /// Second label or memo
        b: String,
    },
}
