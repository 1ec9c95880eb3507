//! CSV import for bank statement exports
//!
//! Statements are the bank's standard CSV export:
//! `Number,Date,Account,Amount,Subcategory,Memo` with `DD/MM/YYYY` dates and
//! signed amounts. Each row is resolved once into a [`Category`] and given a
//! normalized counterparty label.

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use serde_json::{json, Value};
use std::io::Read;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{CategorizedBatch, Category, Transaction};
use crate::normalize::normalize_label;

/// One parsed statement row, before categorization
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub transaction_number: Option<String>,
    pub date: NaiveDate,
    pub account: String,
    /// Magnitude of the signed statement amount
    pub amount: f64,
    pub subcategory: String,
    pub memo: String,
    /// Original CSV row as JSON
    pub original_data: String,
}

/// Column positions resolved from the header row
struct Columns {
    number: Option<usize>,
    date: usize,
    account: Option<usize>,
    amount: usize,
    subcategory: Option<usize>,
    memo: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        Ok(Self {
            number: find("Number"),
            date: find("Date").ok_or_else(|| Error::Import("Missing Date column".into()))?,
            account: find("Account"),
            amount: find("Amount").ok_or_else(|| Error::Import("Missing Amount column".into()))?,
            subcategory: find("Subcategory"),
            memo: find("Memo"),
        })
    }
}

/// Get a trimmed field, treating absent and blank cells alike
fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Convert a CSV record to a JSON object using headers as keys
fn record_to_json(headers: &StringRecord, record: &StringRecord) -> String {
    let mut map = serde_json::Map::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(value) = record.get(i) {
            map.insert(header.to_string(), Value::String(value.to_string()));
        }
    }
    json!(map).to_string()
}

/// Parse a statement CSV into rows
///
/// Rows without a date or amount are skipped silently (blank lines, footer
/// rows). Rows whose date or amount cannot be parsed are skipped with a
/// warning rather than failing the whole statement.
pub fn parse_statement<R: Read>(reader: R) -> Result<Vec<StatementRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;

        let (Some(date_str), Some(amount_str)) = (
            field(&record, Some(columns.date)),
            field(&record, Some(columns.amount)),
        ) else {
            continue;
        };

        let parsed =
            parse_date(date_str).and_then(|date| parse_amount(amount_str).map(|a| (date, a)));
        let (date, amount) = match parsed {
            Ok(values) => values,
            Err(e) => {
                // Header is line 1
                warn!("Skipping statement row {}: {}", line + 2, e);
                continue;
            }
        };

        rows.push(StatementRow {
            transaction_number: field(&record, columns.number).map(String::from),
            date,
            account: field(&record, columns.account).unwrap_or_default().to_string(),
            amount: amount.abs(),
            subcategory: field(&record, columns.subcategory)
                .unwrap_or_default()
                .to_string(),
            memo: field(&record, columns.memo).unwrap_or_default().to_string(),
            original_data: record_to_json(&headers, &record),
        });
    }

    debug!("Parsed {} statement rows", rows.len());
    Ok(rows)
}

/// Split rows into outgoings, income and purchases
///
/// Rows with an untracked subcategory are dropped.
pub fn categorize(rows: Vec<StatementRow>) -> CategorizedBatch {
    let mut batch = CategorizedBatch::default();
    let mut ignored = 0;

    for row in rows {
        let Some(category) = Category::from_subcategory(&row.subcategory) else {
            ignored += 1;
            continue;
        };

        let label = normalize_label(&row.memo);
        let mut tx = Transaction::new(category, row.amount, row.memo)
            .with_date(row.date)
            .with_label(label);
        tx.day_of_month = Some(row.date.day());
        tx.transaction_number = row.transaction_number;
        tx.account = Some(row.account).filter(|a| !a.is_empty());
        tx.subcategory = Some(row.subcategory);
        tx.original_data = Some(row.original_data);

        batch.push(tx);
    }

    debug!(
        "Categorized {} outgoings, {} income, {} purchases ({} ignored)",
        batch.outgoings.len(),
        batch.income.len(),
        batch.purchases.len(),
        ignored
    );
    batch
}

/// Parse and categorize a complete statement
pub fn process_statement<R: Read>(reader: R) -> Result<CategorizedBatch> {
    let rows = parse_statement(reader)?;
    Ok(categorize(rows))
}

/// Parse a date string, trying statement formats in order
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%d/%m/%Y", // 15/01/2024
        "%d/%m/%y", // 15/01/24
        "%Y-%m-%d", // 2024-01-15
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}
