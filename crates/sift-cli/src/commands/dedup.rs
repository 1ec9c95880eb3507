//! Single statement deduplication command

use std::path::Path;

use anyhow::{Context, Result};
use sift_core::{CategorizedBatch, Category, DuplicateDetector, SeenSet, Transaction};
use tracing::info;

use super::{open_config, open_statement, read_known_opt, truncate, write_known};

pub fn cmd_dedup(
    config_path: Option<&Path>,
    file: &Path,
    known: Option<&Path>,
    category: &str,
    save: Option<&Path>,
) -> Result<()> {
    let category: Category = category
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    println!("🔍 Checking {} {} for duplicates...", file.display(), category);

    let (unique, known, total) = run_dedup(config_path, file, known, category)?;

    println!(
        "   Kept {} of {} ({} duplicates dropped)",
        unique.len(),
        total,
        total - unique.len()
    );
    println!();

    if unique.is_empty() {
        println!("   No new transactions.");
    } else {
        println!("   {:10} │ {:36} │ {:>10}", "Date", "Label", "Amount");
        println!("   ───────────┼──────────────────────────────────────┼───────────");
        for tx in &unique {
            let date = tx.date.map(|d| d.to_string()).unwrap_or_default();
            let label = tx.label().filter(|l| !l.is_empty()).unwrap_or(&tx.memo);
            println!(
                "   {:10} │ {:36} │ {:>10.2}",
                date,
                truncate(label, 36),
                tx.amount
            );
        }
    }

    if let Some(save) = save {
        let count = known.len();
        write_known(save, &known.into_transactions())?;
        println!();
        println!(
            "✅ Saved {} known transactions to {}",
            count,
            save.display()
        );
    }

    Ok(())
}

/// Filter one category of a statement against the known set
///
/// Candidates are only checked against known records of the same category.
/// Returns the accepted transactions, the known set with those transactions
/// added to their category, and the number of candidates checked.
pub fn run_dedup(
    config_path: Option<&Path>,
    file: &Path,
    known: Option<&Path>,
    category: Category,
) -> Result<(Vec<Transaction>, CategorizedBatch, usize)> {
    let config = open_config(config_path)?;
    let detector = DuplicateDetector::new(config.dedup).context("Invalid dedup settings")?;

    let batch = open_statement(file)?;
    let mut known = read_known_opt(known)?;

    let mut seen = SeenSet::new(std::mem::take(known.stream_mut(category)));
    let candidates = batch.stream(category);
    let unique = seen.filter_batch(&detector, candidates);
    info!(
        "Kept {} of {} {} transactions from {}",
        unique.len(),
        candidates.len(),
        category,
        file.display()
    );

    *known.stream_mut(category) = seen.into_transactions();
    Ok((unique, known, candidates.len()))
}
