//! Summary statistics over the final transaction streams

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Totals and per-period averages for outgoings, income and purchases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub num_periods: usize,
    pub total_outgoings: f64,
    pub total_income: f64,
    pub total_purchases: f64,
    /// Outgoings plus purchases
    pub total_spent: f64,
    /// Income minus total spent
    pub net_position: f64,
    pub avg_monthly_outgoings: f64,
    pub avg_monthly_income: f64,
    pub avg_monthly_purchases: f64,
    pub avg_monthly_spent: f64,
    pub num_outgoing_transactions: usize,
    pub num_income_transactions: usize,
    pub num_purchase_transactions: usize,
}

/// Reduce the three streams into summary statistics
///
/// Averages divide by `num_periods` and are zero when there are no periods.
pub fn compute_statistics(
    outgoings: &[Transaction],
    income: &[Transaction],
    purchases: &[Transaction],
    num_periods: usize,
) -> Statistics {
    let total_outgoings = total(outgoings);
    let total_income = total(income);
    let total_purchases = total(purchases);
    let total_spent = total_outgoings + total_purchases;

    let per_period = |amount: f64| {
        if num_periods == 0 {
            0.0
        } else {
            amount / num_periods as f64
        }
    };

    Statistics {
        num_periods,
        total_outgoings,
        total_income,
        total_purchases,
        total_spent,
        net_position: total_income - total_spent,
        avg_monthly_outgoings: per_period(total_outgoings),
        avg_monthly_income: per_period(total_income),
        avg_monthly_purchases: per_period(total_purchases),
        avg_monthly_spent: per_period(total_spent),
        num_outgoing_transactions: outgoings.len(),
        num_income_transactions: income.len(),
        num_purchase_transactions: purchases.len(),
    }
}

fn total(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}
