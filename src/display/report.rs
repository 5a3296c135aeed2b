//! Report formatting utilities
//!
//! Renders monthly reports as lightly marked-up chat text. Amounts are
//! rounded to two decimals here and nowhere else.

use crate::reports::{Grouping, MonthlyOutcome, MonthlyReport};

/// Format an amount with two decimals and a trailing currency symbol
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    format!("{:.2}{}", amount, currency_symbol)
}

/// Format one grouping block, or its "no records" marker
pub fn format_grouping(title: &str, grouping: &Grouping, currency_symbol: &str) -> String {
    if grouping.is_empty() {
        return format!("{}: no records", title);
    }

    let mut output = format!("{}:\n", title);
    for (key, amount) in grouping.entries() {
        output.push_str(&format!("{}: {}\n", key, format_amount(*amount, currency_symbol)));
    }
    output.push_str(&format!("Total: {}", format_amount(grouping.total(), currency_symbol)));
    output
}

/// Format a full monthly report
pub fn format_monthly_report(report: &MonthlyReport, currency_symbol: &str) -> String {
    format!(
        "📊 *Report for {}*\n\n{}\n\n{}",
        report.month,
        format_grouping("💸 Expenses", &report.expenses, currency_symbol),
        format_grouping("💰 Income", &report.incomes, currency_symbol)
    )
}

/// Format either a report or the no-data message
pub fn format_monthly_outcome(outcome: &MonthlyOutcome, currency_symbol: &str) -> String {
    match outcome {
        MonthlyOutcome::Report(report) => format_monthly_report(report, currency_symbol),
        MonthlyOutcome::NoData { month } => format!("No data for {}", month),
    }
}
