//! Sift Core Library
//!
//! Shared functionality for the Sift statement analyzer:
//! - CSV import and categorization of bank statements
//! - Merchant/source label normalization
//! - Near-duplicate detection against previously seen transactions
//! - Cross-period consistency grouping of recurring bills and income
//! - Summary statistics
//! - TOML configuration with embedded defaults

pub mod analyze;
pub mod config;
pub mod consistency;
pub mod dedup;
pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod similarity;
pub mod stats;

pub use analyze::{AnalysisReport, Analyzer};
pub use config::{load_config, parse_config, Config, DedupPolicy};
pub use consistency::{consistency_threshold, group_consistent};
pub use dedup::{DedupConfig, DuplicateCheck, DuplicateDetector, SeenSet};
pub use error::{Error, Result};
pub use import::{categorize, parse_statement, process_statement, StatementRow};
pub use models::{CategorizedBatch, Category, Consistency, KeyField, Period, Transaction};
pub use normalize::normalize_label;
pub use similarity::gestalt_ratio;
pub use stats::{compute_statistics, Statistics};
