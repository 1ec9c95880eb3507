//! Cross-period consistency grouping
//!
//! Finds counterparties that show up in enough of the analyzed periods to be
//! treated as reliable recurring bills or income, and collapses each one into
//! a single representative transaction with an averaged amount.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{Consistency, KeyField, Period, Transaction};
use crate::normalize::comparison_key;

/// Histories this short require the key in every period
const SHORT_HISTORY_PERIODS: usize = 3;

/// Share of periods a key must appear in for longer histories
const MAJORITY_FRACTION: f64 = 0.7;

/// Lower bound on the threshold for longer histories
const MIN_PERIODS_PRESENT: usize = 2;

/// Minimum number of distinct periods a key must appear in to be consistent
pub fn consistency_threshold(num_periods: usize) -> usize {
    if num_periods <= SHORT_HISTORY_PERIODS {
        num_periods
    } else {
        let majority = (num_periods as f64 * MAJORITY_FRACTION).floor() as usize;
        majority.max(MIN_PERIODS_PRESENT)
    }
}

/// All transactions for one normalized key, split by period
#[derive(Debug)]
struct KeyGroup<'a> {
    /// First transaction seen for this key; template for the representative
    template: &'a Transaction,
    periods: BTreeMap<Period, Vec<&'a Transaction>>,
}

impl<'a> KeyGroup<'a> {
    fn months_present(&self) -> usize {
        self.periods.len()
    }

    fn transactions(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.periods.values().flatten().copied()
    }
}

/// Keys in first-seen order, each with its per-period transactions
#[derive(Debug, Default)]
struct Grouping<'a> {
    index: HashMap<String, usize>,
    groups: Vec<(String, KeyGroup<'a>)>,
}

impl<'a> Grouping<'a> {
    fn build(transactions: &'a [Transaction], key_field: KeyField) -> Self {
        let mut grouping = Self::default();

        for tx in transactions {
            let key = comparison_key(tx.field(key_field).unwrap_or_default());
            if key.is_empty() {
                debug!("Skipping '{}' - no {} to group by", tx.memo, key_field);
                continue;
            }
            let Some(period) = tx.period() else {
                debug!("Skipping '{}' - no full date to assign a period", tx.memo);
                continue;
            };

            let slot = match grouping.index.get(&key) {
                Some(&slot) => slot,
                None => {
                    grouping.index.insert(key.clone(), grouping.groups.len());
                    grouping.groups.push((
                        key,
                        KeyGroup {
                            template: tx,
                            periods: BTreeMap::new(),
                        },
                    ));
                    grouping.groups.len() - 1
                }
            };

            grouping.groups[slot]
                .1
                .periods
                .entry(period)
                .or_default()
                .push(tx);
        }

        grouping
    }
}

/// Collapse transactions that recur across enough periods into representatives
///
/// Transactions are grouped by the normalized `key_field` value (empty keys
/// are dropped) and then by calendar month. A group is admitted when it
/// appears in at least [`consistency_threshold`] distinct months. Each
/// admitted group yields a copy of its first transaction whose amount is the
/// mean of every transaction in the group, annotated with the occurrence
/// count and months present. Output follows the order keys were first seen.
///
/// With a single period there is no cross-period signal; callers should pass
/// transactions through instead of calling this.
pub fn group_consistent(
    transactions: &[Transaction],
    num_periods: usize,
    key_field: KeyField,
) -> Vec<Transaction> {
    let threshold = consistency_threshold(num_periods);
    let grouping = Grouping::build(transactions, key_field);

    let mut consistent = Vec::new();
    for (key, group) in &grouping.groups {
        let months_present = group.months_present();
        if months_present < threshold {
            debug!(
                "'{}' not consistent - present in {} of {} periods (need {})",
                key, months_present, num_periods, threshold
            );
            continue;
        }

        let amounts: Vec<f64> = group.transactions().map(|t| t.amount).collect();
        let average = amounts.iter().sum::<f64>() / amounts.len() as f64;

        let mut representative = group.template.clone();
        representative.amount = average;
        representative.consistency = Some(Consistency {
            occurrence_count: amounts.len(),
            months_present,
            is_consistent: true,
        });

        debug!(
            "'{}' consistent - {} occurrences across {} periods, avg {:.2}",
            key,
            amounts.len(),
            months_present,
            average
        );
        consistent.push(representative);
    }

    consistent
}
