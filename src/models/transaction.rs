//! Transaction model
//!
//! Ledger entries are immutable once appended. `year` and `month` are
//! derived from the timestamp when a transaction is created, but rows read
//! back from the store keep whatever strings were stored. Only the fields
//! reports aggregate on (kind and amount) are decoded strictly.

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Header row that leads the ledger table
pub const LEDGER_HEADER: [&str; 8] = [
    "Timestamp",
    "Year",
    "Month",
    "Kind",
    "Amount",
    "Category",
    "Subcategory",
    "Author",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether money went out or came in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Token stored in the ledger's kind column
    pub fn token(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(LedgerError::Validation(format!(
                "Unknown transaction kind: {}",
                other
            ))),
        }
    }
}

/// A recorded expense or income
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// As stored; written in `TIMESTAMP_FORMAT`, but older rows may differ
    pub timestamp: String,
    pub year: String,
    /// `YYYY-MM`; reports match on this string verbatim
    pub month: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    /// Display name of the user who submitted it
    pub author: String,
}

impl Transaction {
    /// Create a transaction, deriving year and month from the timestamp
    pub fn new(
        timestamp: NaiveDateTime,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            year: timestamp.format("%Y").to_string(),
            month: timestamp.format("%Y-%m").to_string(),
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            kind,
            amount,
            category: category.into(),
            subcategory: subcategory.into(),
            author: author.into(),
        }
    }

    /// Composite key used to group report lines
    pub fn group_key(&self) -> String {
        format!("{} / {}", self.category, self.subcategory)
    }

    /// Convert to the store's eight-field row
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.year.clone(),
            self.month.clone(),
            self.kind.token().to_string(),
            self.amount.to_string(),
            self.category.clone(),
            self.subcategory.clone(),
            self.author.clone(),
        ]
    }

    /// Decode a store row
    pub fn from_fields(fields: &[String]) -> LedgerResult<Self> {
        if fields.len() < LEDGER_HEADER.len() {
            return Err(LedgerError::Validation(format!(
                "Ledger row has {} fields, expected {}",
                fields.len(),
                LEDGER_HEADER.len()
            )));
        }

        let amount: f64 = fields[4]
            .trim()
            .parse()
            .map_err(|_| LedgerError::InvalidAmount(fields[4].clone()))?;

        Ok(Self {
            timestamp: fields[0].clone(),
            year: fields[1].clone(),
            month: fields[2].clone(),
            kind: fields[3].parse()?,
            amount,
            category: fields[5].clone(),
            subcategory: fields[6].clone(),
            author: fields[7].clone(),
        })
    }
}

/// Parse amount text typed by a user
///
/// Accepts a non-negative finite decimal with `.` as the decimal point.
pub fn parse_amount(text: &str) -> LedgerResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(LedgerError::InvalidAmount(trimmed.to_string())),
    }
}
