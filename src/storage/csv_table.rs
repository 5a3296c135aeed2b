//! CSV file backend for tabular stores
//!
//! Appends go straight to the end of the file. Full rewrites go to a temp
//! file in the same directory which is then renamed over the table file, so
//! the table is either completely replaced or left untouched.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{LedgerError, LedgerResult};

use super::table::{Row, TabularStore};

/// A table stored as a headerless, flexible-width CSV file
pub struct CsvTable {
    path: PathBuf,
    /// Serializes file access within this process
    lock: Mutex<()>,
}

impl CsvTable {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> LedgerResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire table lock: {}", e)))
    }

    fn ensure_parent(&self) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::StoreUnavailable(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

impl TabularStore for CsvTable {
    fn read_all_rows(&self) -> LedgerResult<Vec<Row>> {
        let _guard = self.guard()?;

        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to parse {}: {}", self.path.display(), e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }

    fn append_row(&self, row: &[String]) -> LedgerResult<()> {
        let _guard = self.guard()?;
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        writer.write_record(row)?;
        writer
            .flush()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to flush row: {}", e)))?;

        Ok(())
    }

    fn clear_and_write(&self, rows: &[Row]) -> LedgerResult<()> {
        let _guard = self.guard()?;
        self.ensure_parent()?;

        let temp_path = self.path.with_extension("csv.tmp");

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&temp_path)
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to create temp file: {}", e)))?;

        for row in rows {
            writer.write_record(row)?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to flush data: {}", e)))?;

        // Sync to disk before rename
        file.sync_all()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to sync data: {}", e)))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LedgerError::StoreUnavailable(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::row;
    use tempfile::TempDir;

    fn create_table() -> (TempDir, CsvTable) {
        let temp_dir = TempDir::new().unwrap();
        let table = CsvTable::new(temp_dir.path().join("data").join("table.csv"));
        (temp_dir, table)
    }

    #[test]
    fn test_read_nonexistent_is_empty() {
        let (_temp_dir, table) = create_table();
        assert!(table.read_all_rows().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_parent_and_preserves_order() {
        let (_temp_dir, table) = create_table();

        table.append_row(&row(&["Category", "Subcategory"])).unwrap();
        table.append_row(&row(&["Food", "Cafe"])).unwrap();
        table.append_row(&row(&["Pets", ""])).unwrap();

        let rows = table.read_all_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], row(&["Food", "Cafe"]));
        assert_eq!(rows[2], row(&["Pets", ""]));
    }

    #[test]
    fn test_fields_with_commas_and_quotes() {
        let (_temp_dir, table) = create_table();

        table.append_row(&row(&["Bills, misc", "say \"hi\""])).unwrap();

        let rows = table.read_all_rows().unwrap();
        assert_eq!(rows[0], row(&["Bills, misc", "say \"hi\""]));
    }

    #[test]
    fn test_clear_and_write_replaces_contents() {
        let (temp_dir, table) = create_table();

        table.append_row(&row(&["old", "row"])).unwrap();
        table
            .clear_and_write(&[row(&["a", "1"]), row(&["b", "2"])])
            .unwrap();

        let rows = table.read_all_rows().unwrap();
        assert_eq!(rows, vec![row(&["a", "1"]), row(&["b", "2"])]);
        assert!(!temp_dir.path().join("data").join("table.csv.tmp").exists());
    }

    #[test]
    fn test_mixed_widths_are_accepted() {
        let (_temp_dir, table) = create_table();

        table.append_row(&row(&["one"])).unwrap();
        table.append_row(&row(&["a", "b", "c"])).unwrap();

        let rows = table.read_all_rows().unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 3);
    }
}
