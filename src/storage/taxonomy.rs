//! Taxonomy table adapter
//!
//! Reads and replaces the category → subcategory table, keeping the fixed
//! header as the first row.

use std::sync::Arc;

use tracing::warn;

use crate::error::LedgerResult;
use crate::models::{TaxonomyRow, TAXONOMY_HEADER};

use super::table::{is_header, row, Row, TabularStore};

/// Typed access to the taxonomy table
pub struct TaxonomyTable {
    store: Arc<dyn TabularStore>,
}

impl TaxonomyTable {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// All data rows in table order, header excluded
    pub fn read_rows(&self) -> LedgerResult<Vec<TaxonomyRow>> {
        let rows = self.store.read_all_rows()?;
        let mut iter = rows.iter().peekable();

        match iter.peek() {
            Some(first) if is_header(first, &TAXONOMY_HEADER) => {
                iter.next();
            }
            Some(first) => warn!(row = ?first, "Taxonomy table does not start with its header"),
            None => {}
        }

        Ok(iter.filter_map(|fields| TaxonomyRow::from_fields(fields)).collect())
    }

    /// Append one row at the end of the table
    pub fn append(&self, entry: &TaxonomyRow) -> LedgerResult<()> {
        self.store.append_row(&entry.to_fields())
    }

    /// Replace every data row, writing the header first in the same bulk write
    pub fn replace_all(&self, entries: &[TaxonomyRow]) -> LedgerResult<()> {
        let mut rows: Vec<Row> = Vec::with_capacity(entries.len() + 1);
        rows.push(row(&TAXONOMY_HEADER));
        rows.extend(entries.iter().map(TaxonomyRow::to_fields));
        self.store.clear_and_write(&rows)
    }

    /// Seed the default taxonomy when the table has no data rows
    ///
    /// Returns true when seeding happened.
    pub fn ensure_seeded(&self) -> LedgerResult<bool> {
        if !self.read_rows()?.is_empty() {
            return Ok(false);
        }

        self.replace_all(&TaxonomyRow::defaults())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryTable;

    fn table_with(rows: Vec<Row>) -> (Arc<MemoryTable>, TaxonomyTable) {
        let store = Arc::new(MemoryTable::with_rows(rows));
        let table = TaxonomyTable::new(store.clone());
        (store, table)
    }

    #[test]
    fn test_read_skips_header() {
        let (_store, table) = table_with(vec![
            row(&TAXONOMY_HEADER),
            row(&["Food", "Cafe"]),
            row(&["Pets", ""]),
        ]);

        let rows = table.read_rows().unwrap();
        assert_eq!(rows, vec![TaxonomyRow::new("Food", "Cafe"), TaxonomyRow::bare("Pets")]);
    }

    #[test]
    fn test_read_without_header_keeps_all_rows() {
        let (_store, table) = table_with(vec![row(&["Food", "Cafe"])]);
        assert_eq!(table.read_rows().unwrap().len(), 1);
    }

    #[test]
    fn test_seed_empty_table() {
        let (store, table) = table_with(Vec::new());

        assert!(table.ensure_seeded().unwrap());

        let raw = store.snapshot();
        assert_eq!(raw[0], row(&TAXONOMY_HEADER));
        assert_eq!(raw.len(), TaxonomyRow::defaults().len() + 1);
    }

    #[test]
    fn test_seed_header_only_table() {
        let (_store, table) = table_with(vec![row(&TAXONOMY_HEADER)]);
        assert!(table.ensure_seeded().unwrap());
        assert_eq!(table.read_rows().unwrap(), TaxonomyRow::defaults());
    }

    #[test]
    fn test_seed_skips_populated_table() {
        let (_store, table) = table_with(vec![row(&TAXONOMY_HEADER), row(&["Pets", "Food"])]);

        assert!(!table.ensure_seeded().unwrap());
        assert_eq!(table.read_rows().unwrap(), vec![TaxonomyRow::new("Pets", "Food")]);
    }

    #[test]
    fn test_replace_all_writes_header_first() {
        let (store, table) = table_with(vec![row(&["junk"])]);

        table.replace_all(&[TaxonomyRow::new("A", "B")]).unwrap();

        assert_eq!(store.snapshot(), vec![row(&TAXONOMY_HEADER), row(&["A", "B"])]);
    }
}
