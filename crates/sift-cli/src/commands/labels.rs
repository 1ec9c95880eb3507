//! Label normalization and comparison commands

use std::path::Path;

use anyhow::{Context, Result};
use sift_core::{gestalt_ratio, normalize::comparison_key, normalize_label, DuplicateDetector};

use super::open_config;

pub fn cmd_normalize(memo: &str) -> Result<()> {
    let label = normalize_label(memo);

    println!("   Memo:  {}", memo);
    if label.is_empty() {
        println!("   Label: (empty)");
    } else {
        println!("   Label: {}", label);
    }

    Ok(())
}

pub fn cmd_compare(config_path: Option<&Path>, a: &str, b: &str) -> Result<()> {
    let config = open_config(config_path)?;
    let detector = DuplicateDetector::new(config.dedup).context("Invalid dedup settings")?;
    let threshold = detector.config().name_similarity_threshold;
    let ratio = label_similarity(a, b);

    println!("   A: {}", comparison_key(&normalize_label(a)));
    println!("   B: {}", comparison_key(&normalize_label(b)));
    println!("   Similarity: {:.3} (threshold {:.2})", ratio, threshold);

    if ratio >= threshold {
        println!("   ✅ Same counterparty");
    } else {
        println!("   ❌ Different counterparties");
    }

    Ok(())
}

/// Similarity of two memos after normalization, as the duplicate check sees them
pub fn label_similarity(a: &str, b: &str) -> f64 {
    let a = comparison_key(&normalize_label(a));
    let b = comparison_key(&normalize_label(b));
    gestalt_ratio(&a, &b)
}
