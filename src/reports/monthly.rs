//! Monthly Report
//!
//! Sums one month's ledger rows by kind and by "category / subcategory".
//! Rows are selected by exact equality on their stored month string.

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionKind;
use crate::storage::LedgerTable;

/// Usage text returned for malformed report requests
pub const REPORT_USAGE: &str = "/report 2025-07";

/// A parsed `<command> <month>` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub month: String,
}

impl ReportRequest {
    /// Parse request text: a command token followed by exactly one month token
    pub fn parse(text: &str) -> LedgerResult<Self> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        match parts.as_slice() {
            [_, month] => Ok(Self {
                month: month.to_string(),
            }),
            _ => Err(LedgerError::MalformedReportRequest {
                usage: REPORT_USAGE.to_string(),
            }),
        }
    }
}

/// Summed amounts for one transaction kind, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Grouping {
    pub fn add(&mut self, key: String, amount: f64) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Grand total, unrounded
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Report for one month with at least one matching row
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub month: String,
    pub expenses: Grouping,
    pub incomes: Grouping,
    pub transaction_count: usize,
}

/// Either a report or the empty-month outcome
#[derive(Debug, Clone, PartialEq)]
pub enum MonthlyOutcome {
    Report(MonthlyReport),
    NoData { month: String },
}

impl MonthlyReport {
    /// Generate the report for `month` (`YYYY-MM`)
    pub fn generate(ledger: &LedgerTable, month: &str) -> LedgerResult<MonthlyOutcome> {
        let mut report = MonthlyReport {
            month: month.to_string(),
            expenses: Grouping::default(),
            incomes: Grouping::default(),
            transaction_count: 0,
        };

        for txn in ledger.read_all()?.iter().filter(|t| t.month == month) {
            let grouping = match txn.kind {
                TransactionKind::Expense => &mut report.expenses,
                TransactionKind::Income => &mut report.incomes,
            };
            grouping.add(txn.group_key(), txn.amount);
            report.transaction_count += 1;
        }

        if report.transaction_count == 0 {
            return Ok(MonthlyOutcome::NoData {
                month: month.to_string(),
            });
        }

        Ok(MonthlyOutcome::Report(report))
    }
}
