//! Near-duplicate suppression
//!
//! A candidate is a duplicate of a known transaction when the counterparty
//! names are similar enough AND either the dates or the amounts are close.
//! The name check is a hard gate; date and amount closeness are alternatives,
//! so a bill that moved by a week but kept its price is still caught, as is
//! one that changed price but kept its collection day.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::normalize::comparison_key;
use crate::similarity::gestalt_ratio;

/// Smallest amount difference (in currency units) always treated as close
const AMOUNT_FLOOR: f64 = 1.0;

/// Tolerances for the duplicate predicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Maximum days between two occurrences to count as the same date
    pub day_tolerance: i64,
    /// Relative amount difference allowed (e.g., 0.07 = 7%)
    pub amount_tolerance: f64,
    /// Minimum name similarity ratio for two labels to be the same counterparty
    pub name_similarity_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            day_tolerance: 3,
            amount_tolerance: 0.07,
            name_similarity_threshold: 0.85,
        }
    }
}

impl DedupConfig {
    /// Reject tolerances outside their meaningful ranges
    pub fn validate(&self) -> Result<()> {
        if self.day_tolerance < 0 {
            return Err(Error::InvalidConfig(format!(
                "day_tolerance must be >= 0, got {}",
                self.day_tolerance
            )));
        }
        if !(self.amount_tolerance > 0.0 && self.amount_tolerance < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "amount_tolerance must be between 0 and 1 (exclusive), got {}",
                self.amount_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.name_similarity_threshold) {
            return Err(Error::InvalidConfig(format!(
                "name_similarity_threshold must be between 0 and 1, got {}",
                self.name_similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Outcome of comparing a candidate against one known transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateCheck {
    /// Name similarity ratio (0.0 when either label is empty)
    pub name_ratio: f64,
    /// Days between the two occurrences, when both sides carry enough date info
    pub days_apart: Option<i64>,
    pub amounts_close: bool,
    pub is_duplicate: bool,
}

impl DuplicateCheck {
    fn not_duplicate(name_ratio: f64) -> Self {
        Self {
            name_ratio,
            days_apart: None,
            amounts_close: false,
            is_duplicate: false,
        }
    }
}

/// Fuzzy duplicate detector
#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    config: DedupConfig,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self {
            config: DedupConfig::default(),
        }
    }
}

impl DuplicateDetector {
    /// Create a detector, failing on out-of-range tolerances
    pub fn new(config: DedupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Compare a candidate against a known transaction
    pub fn compare(&self, candidate: &Transaction, existing: &Transaction) -> DuplicateCheck {
        let candidate_name = comparison_label(candidate);
        let existing_name = comparison_label(existing);

        if candidate_name.is_empty() || existing_name.is_empty() {
            return DuplicateCheck::not_duplicate(0.0);
        }

        let name_ratio = gestalt_ratio(&candidate_name, &existing_name);
        if name_ratio < self.config.name_similarity_threshold {
            return DuplicateCheck::not_duplicate(name_ratio);
        }

        let days_apart = days_apart(candidate, existing);
        let amounts_close = self.amounts_close(candidate.amount, existing.amount);
        let day_is_close = days_apart.is_some_and(|days| days <= self.config.day_tolerance);

        DuplicateCheck {
            name_ratio,
            days_apart,
            amounts_close,
            is_duplicate: day_is_close || amounts_close,
        }
    }

    /// Whether `candidate` duplicates `existing`
    pub fn is_duplicate(&self, candidate: &Transaction, existing: &Transaction) -> bool {
        self.compare(candidate, existing).is_duplicate
    }

    /// Keep the candidates that do not duplicate a known or earlier-accepted transaction
    ///
    /// Candidates are checked in order, and each accepted candidate joins the
    /// working set, so repeats within the same batch are dropped too.
    pub fn filter_duplicates(
        &self,
        candidates: &[Transaction],
        known: &[Transaction],
    ) -> Vec<Transaction> {
        let mut seen: Vec<&Transaction> = known.iter().collect();
        let mut unique = Vec::new();

        for candidate in candidates {
            if let Some(existing) = seen.iter().find(|e| self.is_duplicate(candidate, e)) {
                debug!(
                    "Dropping duplicate {} '{}' ({:.2}) - matches '{}' ({:.2})",
                    candidate.category,
                    candidate.memo,
                    candidate.amount,
                    existing.memo,
                    existing.amount
                );
                continue;
            }
            seen.push(candidate);
            unique.push(candidate.clone());
        }

        unique
    }

    fn amounts_close(&self, a: f64, b: f64) -> bool {
        let (a, b) = (a.abs(), b.abs());
        let allowed = (self.config.amount_tolerance * a.max(b)).max(AMOUNT_FLOOR);
        (a - b).abs() <= allowed
    }
}

/// Transactions accepted so far, threaded by the caller across batches
///
/// Seed it with previously stored transactions, then feed each batch in
/// period order so later batches dedupe against everything accepted before.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    transactions: Vec<Transaction>,
}

impl SeenSet {
    pub fn new(known: Vec<Transaction>) -> Self {
        Self {
            transactions: known,
        }
    }

    /// Filter a batch against the set and add the accepted transactions to it
    pub fn filter_batch(
        &mut self,
        detector: &DuplicateDetector,
        candidates: &[Transaction],
    ) -> Vec<Transaction> {
        let unique = detector.filter_duplicates(candidates, &self.transactions);
        self.transactions.extend(unique.iter().cloned());
        unique
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Counterparty label used for name comparison, falling back to the memo
fn comparison_label(tx: &Transaction) -> String {
    let label = tx.label().filter(|l| !l.is_empty()).unwrap_or(&tx.memo);
    comparison_key(label)
}

/// Days between two transactions: full dates first, then days of month
fn days_apart(a: &Transaction, b: &Transaction) -> Option<i64> {
    if let (Some(da), Some(db)) = (a.date, b.date) {
        return Some((da - db).num_days().abs());
    }
    match (a.day(), b.day()) {
        (Some(x), Some(y)) => Some((i64::from(x) - i64::from(y)).abs()),
        _ => None,
    }
}
