//! Tabular store interface
//!
//! The taxonomy and the ledger each live in a table of string rows, the
//! shape a spreadsheet worksheet or a CSV file exposes. Adapters above this
//! layer translate rows into typed records.

use crate::error::LedgerResult;

/// One table row: ordered string fields
pub type Row = Vec<String>;

/// A table of ordered rows held by an external store
///
/// Every failure is reported as `LedgerError::StoreUnavailable`; nothing in
/// this layer retries.
///
/// `clear_and_write` replaces the whole table. Backends should make it a
/// single bulk write. When a backend cannot, a failure part way through may
/// leave the table truncated, and two callers rewriting from different
/// snapshots can lose one another's update; callers serialize rewrites to
/// keep the second case out.
pub trait TabularStore: Send + Sync {
    /// Read every row, header included, in table order
    fn read_all_rows(&self) -> LedgerResult<Vec<Row>>;

    /// Append one row at the end of the table
    fn append_row(&self, row: &[String]) -> LedgerResult<()>;

    /// Replace the table contents with `rows`
    fn clear_and_write(&self, rows: &[Row]) -> LedgerResult<()>;
}

/// Build a row from string-like fields
pub fn row<S: AsRef<str>>(fields: &[S]) -> Row {
    fields.iter().map(|f| f.as_ref().to_string()).collect()
}

/// Whether `candidate` is exactly the given header
pub fn is_header<S: AsRef<str>>(candidate: &[String], header: &[S]) -> bool {
    candidate.len() == header.len()
        && candidate
            .iter()
            .zip(header.iter())
            .all(|(a, b)| a == b.as_ref())
}
