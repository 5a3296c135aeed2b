//! Reports module for ledger-bot
//!
//! Aggregations computed from the ledger on demand; nothing here is stored.

pub mod monthly;

pub use monthly::{Grouping, MonthlyOutcome, MonthlyReport, ReportRequest, REPORT_USAGE};
