//! Configuration loading
//!
//! Config is resolved in layers:
//! 1. An explicit path (e.g. `--config`), when it exists
//! 2. The override in the data dir (~/.local/share/sift/config/sift.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::dedup::DedupConfig;
use crate::error::{Error, Result};
use crate::models::Category;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/sift.toml");

/// Which categories are deduplicated against previously seen records
#[derive(Debug, Clone, PartialEq)]
pub struct DedupPolicy {
    pub categories: Vec<Category>,
}

impl Default for DedupPolicy {
    /// Only outgoings: repeated purchases and income are usually genuine
    fn default() -> Self {
        Self {
            categories: vec![Category::Outgoing],
        }
    }
}

impl DedupPolicy {
    pub fn applies_to(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub dedup: DedupConfig,
    pub dedup_policy: DedupPolicy,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.dedup.validate()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("sift").join("config").join("sift.toml"))
}

/// Load and validate configuration (explicit path, then data dir, then embedded)
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            return parse_config(&fs::read_to_string(path)?);
        }
        warn!("Config file {} not found, using defaults", path.display());
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            debug!("Loading config from {}", default_path.display());
            return parse_config(&fs::read_to_string(&default_path)?);
        }
    }

    parse_config(DEFAULT_CONFIG)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    dedup: Option<RawDedup>,
}

#[derive(Debug, Deserialize)]
struct RawDedup {
    day_tolerance: Option<i64>,
    amount_tolerance: Option<f64>,
    name_similarity_threshold: Option<f64>,
    categories: Option<Vec<String>>,
}

/// Parse and validate config from TOML content
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = Config::default();

    if let Some(dedup) = raw.dedup {
        if let Some(days) = dedup.day_tolerance {
            config.dedup.day_tolerance = days;
        }
        if let Some(tolerance) = dedup.amount_tolerance {
            config.dedup.amount_tolerance = tolerance;
        }
        if let Some(threshold) = dedup.name_similarity_threshold {
            config.dedup.name_similarity_threshold = threshold;
        }
        if let Some(categories) = dedup.categories {
            config.dedup_policy.categories = categories
                .iter()
                .map(|name| name.parse::<Category>().map_err(Error::InvalidConfig))
                .collect::<Result<_>>()?;
        }
    }

    config.validate()?;
    Ok(config)
}
