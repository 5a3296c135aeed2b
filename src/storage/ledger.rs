//! Ledger table adapter
//!
//! Append-only access to the transaction table. Reads exist for reports.

use std::sync::Arc;

use tracing::warn;

use crate::error::LedgerResult;
use crate::models::{Transaction, LEDGER_HEADER};

use super::table::{is_header, row, TabularStore};

/// Typed access to the ledger table
pub struct LedgerTable {
    store: Arc<dyn TabularStore>,
}

impl LedgerTable {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// Append a transaction
    pub fn append(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.store.append_row(&transaction.to_fields())
    }

    /// Decode every transaction row
    ///
    /// The header and rows that cannot be decoded are skipped; the latter
    /// are logged.
    pub fn read_all(&self) -> LedgerResult<Vec<Transaction>> {
        let rows = self.store.read_all_rows()?;

        let transactions = rows
            .iter()
            .enumerate()
            .filter(|(i, fields)| !(*i == 0 && is_header(fields, &LEDGER_HEADER)))
            .filter_map(|(i, fields)| match Transaction::from_fields(fields) {
                Ok(txn) => Some(txn),
                Err(e) => {
                    warn!(row = i + 1, error = %e, "Skipping undecodable ledger row");
                    None
                }
            })
            .collect();

        Ok(transactions)
    }

    /// Write the header into an empty table
    ///
    /// Returns true when the header was written.
    pub fn ensure_header(&self) -> LedgerResult<bool> {
        if !self.store.read_all_rows()?.is_empty() {
            return Ok(false);
        }

        self.store.clear_and_write(&[row(&LEDGER_HEADER)])?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use crate::storage::memory::MemoryTable;
    use chrono::NaiveDate;

    fn sample(amount: f64) -> Transaction {
        let ts = NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Transaction::new(ts, TransactionKind::Expense, amount, "Food", "Cafe", "ann")
    }

    #[test]
    fn test_append_then_read() {
        let store = Arc::new(MemoryTable::new());
        let ledger = LedgerTable::new(store.clone());

        assert!(ledger.ensure_header().unwrap());
        ledger.append(&sample(10.0)).unwrap();
        ledger.append(&sample(2.5)).unwrap();

        let all = ledger.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].amount, 2.5);
        assert_eq!(store.snapshot().len(), 3);
    }

    #[test]
    fn test_ensure_header_is_idempotent() {
        let store = Arc::new(MemoryTable::new());
        let ledger = LedgerTable::new(store.clone());

        assert!(ledger.ensure_header().unwrap());
        assert!(!ledger.ensure_header().unwrap());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_undecodable_rows_are_skipped() {
        let store = Arc::new(MemoryTable::with_rows(vec![
            row(&LEDGER_HEADER),
            sample(5.0).to_fields(),
            row(&["garbage"]),
        ]));
        let ledger = LedgerTable::new(store);

        let all = ledger.read_all().unwrap();
        assert_eq!(all, vec![sample(5.0)]);
    }
}
