//! CLI command for monthly reports

use crate::display::format_monthly_outcome;
use crate::error::LedgerResult;
use crate::reports::MonthlyReport;
use crate::storage::Storage;

/// Print the report for `month` (`YYYY-MM`)
pub fn handle_report_command(storage: &Storage, month: &str, currency_symbol: &str) -> LedgerResult<()> {
    let outcome = MonthlyReport::generate(&storage.ledger, month)?;
    println!("{}", format_monthly_outcome(&outcome, currency_symbol));
    Ok(())
}
