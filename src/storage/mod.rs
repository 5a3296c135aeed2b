//! Storage layer for ledger-bot
//!
//! A `TabularStore` holds rows; the taxonomy and ledger adapters turn those
//! rows into typed records. CSV files back the tables on disk.

pub mod csv_table;
pub mod init;
pub mod ledger;
pub mod memory;
pub mod table;
pub mod taxonomy;

pub use csv_table::CsvTable;
pub use init::{initialize_storage, InitOutcome};
pub use ledger::LedgerTable;
pub use memory::MemoryTable;
pub use table::{Row, TabularStore};
pub use taxonomy::TaxonomyTable;

use std::sync::Arc;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to both tables
pub struct Storage {
    pub taxonomy: TaxonomyTable,
    pub ledger: LedgerTable,
}

impl Storage {
    /// Open the CSV-backed tables under the data directory
    pub fn open(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self::from_stores(
            Arc::new(CsvTable::new(paths.categories_file())),
            Arc::new(CsvTable::new(paths.ledger_file())),
        ))
    }

    /// Build storage over arbitrary table backends
    pub fn from_stores(taxonomy: Arc<dyn TabularStore>, ledger: Arc<dyn TabularStore>) -> Self {
        Self {
            taxonomy: TaxonomyTable::new(taxonomy),
            ledger: LedgerTable::new(ledger),
        }
    }

    /// Storage over two fresh in-memory tables
    pub fn in_memory() -> Self {
        Self::from_stores(Arc::new(MemoryTable::new()), Arc::new(MemoryTable::new()))
    }
}
