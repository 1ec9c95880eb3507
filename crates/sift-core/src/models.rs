//! Domain models for Sift

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transaction category, resolved once when a statement row is categorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Recurring bill-like debit (direct debit, standing order, bill payment)
    Outgoing,
    /// Discretionary card debit
    Purchase,
    /// Credit such as salary or other incoming funds
    Income,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Purchase => "purchase",
            Self::Income => "income",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[Self::Outgoing, Self::Purchase, Self::Income]
    }

    /// Map a bank subcategory onto a category
    ///
    /// Returns None for subcategories that are not tracked (transfers, fees, etc.)
    pub fn from_subcategory(subcategory: &str) -> Option<Self> {
        match subcategory.trim() {
            "Direct Debit" | "Bill Payment" | "Standing Order" | "Credit Payment" => {
                Some(Self::Outgoing)
            }
            "Debit" | "Card Purchase" => Some(Self::Purchase),
            // Unpaid rows are returned payments, so they count as money coming in
            "Counter Credit" | "Unpaid" => Some(Self::Income),
            _ => None,
        }
    }

    /// Which label field identifies the counterparty for this category
    pub fn key_field(&self) -> KeyField {
        match self {
            Self::Outgoing | Self::Purchase => KeyField::Merchant,
            Self::Income => KeyField::Source,
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outgoing" | "outgoings" => Ok(Self::Outgoing),
            "purchase" | "purchases" => Ok(Self::Purchase),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label field used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyField {
    Merchant,
    Source,
}

impl KeyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::Source => "source",
        }
    }
}

impl std::fmt::Display for KeyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calendar month, the unit over which consistency is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Annotations carried by a representative record of a consistent group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consistency {
    /// Total number of transactions that contributed to the group
    pub occurrence_count: usize,
    /// Number of distinct periods the key appeared in
    pub months_present: usize,
    pub is_consistent: bool,
}

/// A categorized transaction taken from a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub category: Category,
    /// Always a magnitude; direction comes from the category
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Explicit day of month, for records where the full date is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    /// Counterparty label for outgoings and purchases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Counterparty label for income
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Original statement description, kept verbatim
    #[serde(default)]
    pub memo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Original CSV row as JSON (for traceability)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_data: Option<String>,
    /// Set only on representative records emitted by the consistency grouper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
}

impl Transaction {
    /// Create a transaction; the amount is stored as a magnitude
    pub fn new(category: Category, amount: f64, memo: impl Into<String>) -> Self {
        Self {
            category,
            amount: amount.abs(),
            date: None,
            day_of_month: None,
            merchant: None,
            source: None,
            memo: memo.into(),
            transaction_number: None,
            account: None,
            subcategory: None,
            original_data: None,
            consistency: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_day_of_month(mut self, day: u32) -> Result<Self> {
        validate_day_of_month(day)?;
        self.day_of_month = Some(day);
        Ok(self)
    }

    /// Set the counterparty label in the field matching the category
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        match self.category.key_field() {
            KeyField::Merchant => self.merchant = Some(label),
            KeyField::Source => self.source = Some(label),
        }
        self
    }

    /// Get the value of a label field
    pub fn field(&self, key_field: KeyField) -> Option<&str> {
        match key_field {
            KeyField::Merchant => self.merchant.as_deref(),
            KeyField::Source => self.source.as_deref(),
        }
    }

    /// Counterparty label for this transaction's own category
    pub fn label(&self) -> Option<&str> {
        self.field(self.category.key_field())
    }

    /// Effective day of month: the explicit value, else derived from the date
    pub fn day(&self) -> Option<u32> {
        self.day_of_month.or_else(|| self.date.map(|d| d.day()))
    }

    /// Year-month period, only available when the full date is known
    pub fn period(&self) -> Option<Period> {
        self.date.map(Period::from_date)
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency.is_some_and(|c| c.is_consistent)
    }

    /// Check the invariants of a record loaded from outside the importer
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if let Some(day) = self.day_of_month {
            validate_day_of_month(day)?;
        }
        Ok(())
    }
}

fn validate_day_of_month(day: u32) -> Result<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "Day of month must be between 1 and 31, got {}",
            day
        )))
    }
}

/// Transactions from one statement, partitioned by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedBatch {
    pub outgoings: Vec<Transaction>,
    pub income: Vec<Transaction>,
    pub purchases: Vec<Transaction>,
}

impl CategorizedBatch {
    /// Partition a flat list of transactions by category, keeping order
    pub fn from_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let mut batch = Self::default();
        for tx in transactions {
            batch.push(tx);
        }
        batch
    }

    pub fn push(&mut self, tx: Transaction) {
        self.stream_mut(tx.category).push(tx);
    }

    pub fn stream(&self, category: Category) -> &[Transaction] {
        match category {
            Category::Outgoing => &self.outgoings,
            Category::Purchase => &self.purchases,
            Category::Income => &self.income,
        }
    }

    pub fn stream_mut(&mut self, category: Category) -> &mut Vec<Transaction> {
        match category {
            Category::Outgoing => &mut self.outgoings,
            Category::Purchase => &mut self.purchases,
            Category::Income => &mut self.income,
        }
    }

    pub fn len(&self) -> usize {
        self.outgoings.len() + self.income.len() + self.purchases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All transactions, outgoings first, then income, then purchases
    pub fn into_transactions(self) -> Vec<Transaction> {
        let mut all = self.outgoings;
        all.extend(self.income);
        all.extend(self.purchases);
        all
    }
}
