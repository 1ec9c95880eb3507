//! Multi-period analysis pipeline
//!
//! Runs statements through deduplication, consistency grouping and
//! statistics in period order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, DedupPolicy};
use crate::consistency::group_consistent;
use crate::dedup::{DuplicateDetector, SeenSet};
use crate::error::Result;
use crate::models::{CategorizedBatch, Category, Transaction};
use crate::stats::{compute_statistics, Statistics};

/// Final transaction streams and their summary statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub outgoings: Vec<Transaction>,
    pub income: Vec<Transaction>,
    pub purchases: Vec<Transaction>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    detector: DuplicateDetector,
    policy: DedupPolicy,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            detector: DuplicateDetector::new(config.dedup)?,
            policy: config.dedup_policy,
        })
    }

    pub fn detector(&self) -> &DuplicateDetector {
        &self.detector
    }

    pub fn policy(&self) -> &DedupPolicy {
        &self.policy
    }

    /// Analyze statements given in period order, one batch per period
    ///
    /// `existing` holds previously stored transactions; categories enabled by
    /// the dedup policy are filtered against them and against everything
    /// accepted from earlier batches. With more than one period, outgoings
    /// and income are collapsed to their consistent representatives.
    pub fn analyze(
        &self,
        batches: &[CategorizedBatch],
        existing: &CategorizedBatch,
    ) -> AnalysisReport {
        let num_periods = batches.len();
        let accepted = self.dedup_batches(batches, existing);

        let (outgoings, income) = if num_periods <= 1 {
            (accepted.outgoings, accepted.income)
        } else {
            let outgoings = group_consistent(
                &accepted.outgoings,
                num_periods,
                Category::Outgoing.key_field(),
            );
            let income =
                group_consistent(&accepted.income, num_periods, Category::Income.key_field());
            info!(
                "Found {} consistent outgoings and {} consistent income sources over {} periods",
                outgoings.len(),
                income.len(),
                num_periods
            );
            (outgoings, income)
        };
        let purchases = accepted.purchases;

        let statistics = compute_statistics(&outgoings, &income, &purchases, num_periods);
        info!(
            "Analysis complete: {:.2} out, {:.2} in, net {:.2}",
            statistics.total_spent, statistics.total_income, statistics.net_position
        );

        AnalysisReport {
            outgoings,
            income,
            purchases,
            statistics,
        }
    }

    /// Filter every batch through per-category seen sets, in order
    fn dedup_batches(
        &self,
        batches: &[CategorizedBatch],
        existing: &CategorizedBatch,
    ) -> CategorizedBatch {
        let mut seen: Vec<(Category, SeenSet)> = Category::all()
            .iter()
            .filter(|c| self.policy.applies_to(**c))
            .map(|&c| (c, SeenSet::new(existing.stream(c).to_vec())))
            .collect();

        let mut accepted = CategorizedBatch::default();
        for (period, batch) in batches.iter().enumerate() {
            let before = accepted.len();

            for &category in Category::all() {
                let candidates = batch.stream(category);
                let kept = match seen.iter_mut().find(|(c, _)| *c == category) {
                    Some((_, set)) => set.filter_batch(&self.detector, candidates),
                    None => candidates.to_vec(),
                };
                if kept.len() < candidates.len() {
                    debug!(
                        "Period {}: dropped {} duplicate {} transactions",
                        period + 1,
                        candidates.len() - kept.len(),
                        category
                    );
                }
                accepted.stream_mut(category).extend(kept);
            }

            info!(
                "Period {}: kept {} of {} transactions",
                period + 1,
                accepted.len() - before,
                batch.len()
            );
        }

        accepted
    }
}
