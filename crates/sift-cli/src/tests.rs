//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sift_core::Category;
use tempfile::TempDir;

use crate::commands::{self, truncate};

const HEADER: &str = "Number,Date,Account,Amount,Subcategory,Memo";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Config with the built-in defaults, so tests never read a user override
fn default_config(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "sift.toml",
        "[dedup]\nday_tolerance = 3\namount_tolerance = 0.07\n",
    )
}

/// A month with a price-changing energy bill, a flat phone bill, salary and a purchase
fn statement(dir: &TempDir, month: u32, energy: f64) -> PathBuf {
    let content = format!(
        "{HEADER}\n\
         ,01/{month:02}/2024,20-23-97 70176931,-{energy:.2},Direct Debit,OCTOPUS ENERGY DDR\n\
         ,03/{month:02}/2024,20-23-97 70176931,-18.00,Direct Debit,EE LIMITED DDR\n\
         ,12/{month:02}/2024,20-23-97 70176931,-9.50,Card Purchase,PRET A MANGER ON 11 JAN BCC\n\
         ,28/{month:02}/2024,20-23-97 70176931,2500.00,Counter Credit,ACME LTD SALARY BGC\n"
    );
    write_file(dir, &format!("2024-{month:02}.csv"), &content)
}

// ========== Analyze Command Tests ==========

#[test]
fn test_run_analysis_multi_month() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let files = vec![
        statement(&dir, 1, 50.0),
        statement(&dir, 2, 60.0),
        statement(&dir, 3, 70.0),
    ];

    let report = commands::run_analysis(config, &files, None).unwrap();

    assert_eq!(report.statistics.num_periods, 3);
    // The flat phone bill is deduped after January, so only energy recurs
    assert_eq!(report.outgoings.len(), 1);
    assert_eq!(report.outgoings[0].merchant.as_deref(), Some("OCTOPUS ENERGY"));
    assert_eq!(report.outgoings[0].amount, 60.0);
    assert_eq!(report.income.len(), 1);
    assert_eq!(report.income[0].source.as_deref(), Some("ACME LTD SALARY"));
    assert_eq!(report.purchases.len(), 3);
}

#[test]
fn test_cmd_analyze_outputs() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let files = vec![statement(&dir, 1, 50.0), statement(&dir, 2, 60.0)];

    assert!(commands::cmd_analyze(config, &files, None, false, 10).is_ok());
    assert!(commands::cmd_analyze(config, &files, None, true, 10).is_ok());
    assert!(commands::cmd_analyze(config, &files[..1], None, false, 1).is_ok());
}

#[test]
fn test_run_analysis_with_known_set() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let january = statement(&dir, 1, 50.0);
    let known = dir.path().join("known.json");

    // Store January's outgoings, then analyze January again against them
    commands::cmd_dedup(config, &january, None, "outgoing", Some(known.as_path())).unwrap();
    let report = commands::run_analysis(config, &[january], Some(known.as_path())).unwrap();

    assert!(report.outgoings.is_empty());
    // Income and purchases are not deduplicated by default
    assert_eq!(report.income.len(), 1);
    assert_eq!(report.purchases.len(), 1);
}

#[test]
fn test_run_analysis_missing_file() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let missing = dir.path().join("nope.csv");

    let result = commands::run_analysis(config, &[missing], None);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to open file"));
}

#[test]
fn test_run_analysis_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config_file = write_file(&dir, "bad.toml", "[dedup]\namount_tolerance = 1.5\n");
    let config = Some(config_file.as_path());
    let files = vec![statement(&dir, 1, 50.0)];

    assert!(commands::run_analysis(config, &files, None).is_err());
}

// ========== Dedup Command Tests ==========

#[test]
fn test_run_dedup_within_statement() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let file = write_file(
        &dir,
        "dupes.csv",
        &format!(
            "{HEADER}\n\
             ,01/01/2024,x,-18.00,Direct Debit,EE LIMITED DDR\n\
             ,02/01/2024,x,-18.00,Direct Debit,EE LIMITED DDR\n\
             ,20/01/2024,x,-35.00,Direct Debit,EE LIMITED DDR\n"
        ),
    );

    let (unique, updated, total) =
        commands::run_dedup(config, &file, None, Category::Outgoing).unwrap();
    assert_eq!(total, 3);
    // Second row is a day later at the same price; third differs in both
    assert_eq!(unique.len(), 2);
    assert_eq!(unique[1].date, NaiveDate::from_ymd_opt(2024, 1, 20));
    assert_eq!(updated.len(), 2);
}

#[test]
fn test_cmd_dedup_save_then_rerun() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let file = statement(&dir, 1, 50.0);
    let known = dir.path().join("known.json");

    commands::cmd_dedup(config, &file, None, "outgoing", Some(known.as_path())).unwrap();
    let saved = fs::read_to_string(&known).unwrap();
    assert!(saved.contains("OCTOPUS ENERGY"));

    // Everything is already known on the second run
    let (unique, updated, total) =
        commands::run_dedup(config, &file, Some(known.as_path()), Category::Outgoing).unwrap();
    assert_eq!(total, 2);
    assert!(unique.is_empty());
    assert_eq!(updated.len(), 2);
}

#[test]
fn test_cmd_dedup_other_categories() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let file = statement(&dir, 1, 50.0);

    let (income, _, _) =
        commands::run_dedup(config, &file, None, Category::Income).unwrap();
    assert_eq!(income.len(), 1);
    assert!(commands::cmd_dedup(config, &file, None, "purchase", None).is_ok());
}

#[test]
fn test_run_dedup_only_checks_same_category() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    let file = statement(&dir, 1, 50.0);
    // Same name, date and amount as the energy bill, but stored as income
    let known = write_file(
        &dir,
        "known.json",
        r#"[{"category": "income", "amount": 50.0, "source": "OCTOPUS ENERGY", "date": "2024-01-01"}]"#,
    );

    let (unique, updated, total) =
        commands::run_dedup(config, &file, Some(known.as_path()), Category::Outgoing).unwrap();
    assert_eq!(total, 2);
    assert_eq!(unique.len(), 2);
    assert_eq!(updated.outgoings.len(), 2);
    assert_eq!(updated.income.len(), 1);

    let report = commands::run_analysis(config, &[file.clone()], Some(known.as_path())).unwrap();
    assert_eq!(report.outgoings.len(), unique.len());

    // Saving keeps the known income alongside the new outgoings
    let saved = dir.path().join("saved.json");
    commands::cmd_dedup(
        config,
        &file,
        Some(known.as_path()),
        "outgoing",
        Some(saved.as_path()),
    )
    .unwrap();
    let batch = commands::read_known(&saved).unwrap();
    assert_eq!(batch.outgoings.len(), 2);
    assert_eq!(batch.income.len(), 1);
    assert_eq!(batch.income[0].source.as_deref(), Some("OCTOPUS ENERGY"));
}

#[test]
fn test_cmd_dedup_invalid_category() {
    let dir = TempDir::new().unwrap();
    let file = statement(&dir, 1, 50.0);

    let result = commands::cmd_dedup(None, &file, None, "transfers", None);
    assert!(result.is_err());
}

#[test]
fn test_read_known_rejects_bad_files() {
    let dir = TempDir::new().unwrap();

    let garbage = write_file(&dir, "garbage.json", "not json");
    assert!(commands::read_known(&garbage).is_err());

    let bad_day = write_file(
        &dir,
        "bad_day.json",
        r#"[{"category": "outgoing", "amount": 10.0, "memo": "X", "day_of_month": 40}]"#,
    );
    assert!(commands::read_known(&bad_day).is_err());

    let valid = write_file(
        &dir,
        "valid.json",
        r#"[{"category": "income", "amount": 10.0, "source": "ACME", "date": "2024-01-28"}]"#,
    );
    let batch = commands::read_known(&valid).unwrap();
    assert_eq!(batch.income.len(), 1);
    assert_eq!(batch.income[0].memo, "");
}

#[test]
fn test_read_known_opt_without_path() {
    assert!(commands::read_known_opt(None::<&Path>).unwrap().is_empty());
}

// ========== Label Command Tests ==========

#[test]
fn test_cmd_normalize() {
    assert!(commands::cmd_normalize("TESCO STORES 3041 ON 12 MAR BCC").is_ok());
    assert!(commands::cmd_normalize("").is_ok());
}

#[test]
fn test_label_similarity() {
    // Memos are normalized before comparison
    assert_eq!(
        commands::label_similarity("NETFLIX.COM GBP", "netflix.com ON 05 MAR BCC"),
        1.0
    );
    assert!(commands::label_similarity("NETFLIX.COM", "SPOTIFY") < 0.85);
}

#[test]
fn test_cmd_compare() {
    let dir = TempDir::new().unwrap();
    let config_file = default_config(&dir);
    let config = Some(config_file.as_path());
    assert!(commands::cmd_compare(config, "OCTOPUS ENERGY", "OCTOPUS ENERGY LTD").is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long string that exceeds", 10), "a long ..."); // 7 chars + "..."
    assert_eq!(truncate("exact", 5), "exact");
    assert_eq!(truncate("toolong", 6), "too...");
    assert_eq!(truncate("café crème", 6), "caf...");
}
