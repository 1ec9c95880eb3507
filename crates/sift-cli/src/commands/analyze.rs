//! Multi-statement analysis command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sift_core::{AnalysisReport, Analyzer, Statistics, Transaction};
use tracing::info;

use super::{open_config, open_statement, read_known_opt, truncate};

pub fn cmd_analyze(
    config_path: Option<&Path>,
    files: &[PathBuf],
    known: Option<&Path>,
    json: bool,
    top: usize,
) -> Result<()> {
    let report = run_analysis(config_path, files, known)?;

    if json {
        let output =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", output);
        return Ok(());
    }

    print_report(&report, top);
    Ok(())
}

/// Load config, statements and known set, then run the pipeline
pub fn run_analysis(
    config_path: Option<&Path>,
    files: &[PathBuf],
    known: Option<&Path>,
) -> Result<AnalysisReport> {
    let config = open_config(config_path)?;
    let analyzer = Analyzer::new(config).context("Invalid dedup settings")?;

    let batches = files
        .iter()
        .map(|file| open_statement(file))
        .collect::<Result<Vec<_>>>()?;
    let existing = read_known_opt(known)?;

    info!(
        "Analyzing {} statements against {} known transactions (name threshold {:.2})",
        batches.len(),
        existing.len(),
        analyzer.detector().config().name_similarity_threshold
    );
    Ok(analyzer.analyze(&batches, &existing))
}

fn print_report(report: &AnalysisReport, top: usize) {
    let stats = &report.statistics;
    let recurring = stats.num_periods > 1;

    println!();
    println!("📊 Statement Analysis ({} periods)", stats.num_periods);
    println!("   ─────────────────────────────────────────────────────────────");

    print_statistics(stats);

    let (out_title, in_title) = if recurring {
        ("🔁 Consistent Outgoings", "💰 Consistent Income")
    } else {
        ("💸 Outgoings", "💰 Income")
    };
    print_transactions(out_title, "Merchant", &report.outgoings, top);
    print_transactions(in_title, "Source", &report.income, top);

    if recurring && report.outgoings.is_empty() && report.income.is_empty() {
        println!();
        println!("   💡 Tip: Nothing recurred in enough periods; try more statements");
    }
}

fn print_statistics(stats: &Statistics) {
    println!(
        "   {:20} │ {:>12} │ {:>12} │ {:>6}",
        "", "Total", "Per month", "Count"
    );
    println!("   ─────────────────────┼──────────────┼──────────────┼───────");
    println!(
        "   {:20} │ {:>12.2} │ {:>12.2} │ {:>6}",
        "Outgoings",
        stats.total_outgoings,
        stats.avg_monthly_outgoings,
        stats.num_outgoing_transactions
    );
    println!(
        "   {:20} │ {:>12.2} │ {:>12.2} │ {:>6}",
        "Purchases",
        stats.total_purchases,
        stats.avg_monthly_purchases,
        stats.num_purchase_transactions
    );
    println!(
        "   {:20} │ {:>12.2} │ {:>12.2} │",
        "Total spent", stats.total_spent, stats.avg_monthly_spent
    );
    println!(
        "   {:20} │ {:>12.2} │ {:>12.2} │ {:>6}",
        "Income", stats.total_income, stats.avg_monthly_income, stats.num_income_transactions
    );
    println!("   ─────────────────────┼──────────────┼──────────────┼───────");

    let marker = if stats.net_position >= 0.0 {
        "✅"
    } else {
        "⚠️ "
    };
    println!("   {} Net position: {:.2}", marker, stats.net_position);
}

fn print_transactions(title: &str, label_header: &str, transactions: &[Transaction], top: usize) {
    println!();
    println!("{}", title);

    if transactions.is_empty() {
        println!("   None found.");
        return;
    }

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    println!(
        "   {:3} │ {:30} │ {:>10} │ {:>6} │ {:>5}",
        "#", label_header, "Amount", "Months", "Count"
    );
    println!("   ────┼────────────────────────────────┼────────────┼────────┼───────");

    for (i, tx) in sorted.iter().take(top).enumerate() {
        let label = tx.label().filter(|l| !l.is_empty()).unwrap_or(&tx.memo);
        let (months, count) = match tx.consistency {
            Some(c) => (c.months_present.to_string(), c.occurrence_count.to_string()),
            None => ("-".to_string(), "1".to_string()),
        };
        println!(
            "   {:>3} │ {:30} │ {:>10.2} │ {:>6} │ {:>5}",
            i + 1,
            truncate(label, 30),
            tx.amount,
            months,
            count
        );
    }

    if sorted.len() > top {
        println!("   ... and {} more", sorted.len() - top);
    }
}
