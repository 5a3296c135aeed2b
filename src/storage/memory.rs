//! In-memory tabular store
//!
//! Used by tests and by callers that do not need persistence. The store can
//! be switched into an unavailable mode in which every call fails, to
//! exercise `StoreUnavailable` handling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::{LedgerError, LedgerResult};

use super::table::{Row, TabularStore};

#[derive(Default)]
pub struct MemoryTable {
    rows: RwLock<Vec<Row>>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `read_all_rows` calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Row> {
        self.rows.read().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn check_available(&self) -> LedgerResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::StoreUnavailable("in-memory table is offline".into()));
        }
        Ok(())
    }
}

impl TabularStore for MemoryTable {
    fn read_all_rows(&self) -> LedgerResult<Vec<Row>> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let rows = self
            .rows
            .read()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire read lock: {}", e)))?;
        Ok(rows.clone())
    }

    fn append_row(&self, row: &[String]) -> LedgerResult<()> {
        self.check_available()?;

        let mut rows = self
            .rows
            .write()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire write lock: {}", e)))?;
        rows.push(row.to_vec());
        Ok(())
    }

    fn clear_and_write(&self, new_rows: &[Row]) -> LedgerResult<()> {
        self.check_available()?;

        let mut rows = self
            .rows
            .write()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire write lock: {}", e)))?;
        *rows = new_rows.to_vec();
        Ok(())
    }
}
