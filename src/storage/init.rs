//! Storage initialization
//!
//! Handles first-run setup: the taxonomy header plus default categories,
//! and the ledger header.

use tracing::info;

use crate::error::LedgerError;

use super::Storage;

/// What `initialize_storage` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitOutcome {
    pub taxonomy_seeded: bool,
    pub ledger_created: bool,
}

/// Bring both tables into their required initial shape
///
/// Existing data is never overwritten.
pub fn initialize_storage(storage: &Storage) -> Result<InitOutcome, LedgerError> {
    let outcome = InitOutcome {
        taxonomy_seeded: storage.taxonomy.ensure_seeded()?,
        ledger_created: storage.ledger.ensure_header()?,
    };

    if outcome.taxonomy_seeded {
        info!("Seeded default taxonomy");
    }
    if outcome.ledger_created {
        info!("Created ledger table");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{TaxonomyRow, LEDGER_HEADER, TAXONOMY_HEADER};
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();

        let outcome = initialize_storage(&storage).unwrap();

        assert!(outcome.taxonomy_seeded);
        assert!(outcome.ledger_created);
        assert!(paths.categories_file().exists());
        assert!(paths.ledger_file().exists());

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        assert!(content.starts_with(&TAXONOMY_HEADER.join(",")));
        let content = std::fs::read_to_string(paths.ledger_file()).unwrap();
        assert!(content.starts_with(&LEDGER_HEADER.join(",")));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths).unwrap();

        initialize_storage(&storage).unwrap();
        storage
            .taxonomy
            .replace_all(&[TaxonomyRow::new("Custom", "Only")])
            .unwrap();

        let outcome = initialize_storage(&storage).unwrap();

        assert_eq!(outcome, InitOutcome::default());
        assert_eq!(
            storage.taxonomy.read_rows().unwrap(),
            vec![TaxonomyRow::new("Custom", "Only")]
        );
    }
}
