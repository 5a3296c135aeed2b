//! Taxonomy service
//!
//! Business logic for the category → subcategory taxonomy: listing,
//! creating, renaming and deleting. All mutations and the reads that build
//! choice lists go through one reader/writer gate, so a rename or delete
//! never interleaves with another rewrite or with a listing.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{clean_name, TaxonomyRow};
use crate::storage::Storage;

/// Result of a create call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// A new row was appended
    Added,
    /// Uniqueness is enforced and the entry was already present
    AlreadyExists,
}

/// A category with its subcategories, for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub name: String,
    pub subcategories: Vec<String>,
}

/// Service for taxonomy management
pub struct TaxonomyService {
    storage: Arc<Storage>,
    gate: RwLock<()>,
    enforce_unique: bool,
}

impl TaxonomyService {
    /// Create a new taxonomy service
    ///
    /// With `enforce_unique` off, creation appends unconditionally and the
    /// table may collect duplicate rows.
    pub fn new(storage: Arc<Storage>, enforce_unique: bool) -> Self {
        Self {
            storage,
            gate: RwLock::new(()),
            enforce_unique,
        }
    }

    fn read_gate(&self) -> LedgerResult<RwLockReadGuard<'_, ()>> {
        self.gate
            .read()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_gate(&self) -> LedgerResult<RwLockWriteGuard<'_, ()>> {
        self.gate
            .write()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to acquire write lock: {}", e)))
    }

    // === Queries ===

    /// Distinct category names in order of first appearance
    pub fn list_categories(&self) -> LedgerResult<Vec<String>> {
        let _gate = self.read_gate()?;
        let rows = self.storage.taxonomy.read_rows()?;

        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .filter(|r| !r.category.is_empty())
            .filter(|r| seen.insert(r.category.clone()))
            .map(|r| r.category)
            .collect())
    }

    /// Non-empty subcategories of a category, in table order
    pub fn list_subcategories(&self, category: &str) -> LedgerResult<Vec<String>> {
        let _gate = self.read_gate()?;
        let rows = self.storage.taxonomy.read_rows()?;

        Ok(rows
            .into_iter()
            .filter(|r| r.category == category && r.has_subcategory())
            .map(|r| r.subcategory)
            .collect())
    }

    /// Every category with its subcategories
    pub fn list_grouped(&self) -> LedgerResult<Vec<CategoryListing>> {
        let _gate = self.read_gate()?;
        let rows = self.storage.taxonomy.read_rows()?;

        let mut listings: Vec<CategoryListing> = Vec::new();
        for row in rows {
            let position = match listings.iter().position(|l| l.name == row.category) {
                Some(position) => position,
                None => {
                    listings.push(CategoryListing {
                        name: row.category.clone(),
                        subcategories: Vec::new(),
                    });
                    listings.len() - 1
                }
            };
            if row.has_subcategory() {
                listings[position].subcategories.push(row.subcategory);
            }
        }

        Ok(listings)
    }

    /// Number of data rows in the taxonomy table
    pub fn row_count(&self) -> LedgerResult<usize> {
        let _gate = self.read_gate()?;
        Ok(self.storage.taxonomy.read_rows()?.len())
    }

    // === Mutations ===

    /// Add a category with no subcategories yet
    pub fn create_category(&self, name: &str) -> LedgerResult<Creation> {
        let name = clean_name(name, "Category").map_err(|e| LedgerError::Validation(e.to_string()))?;

        let _gate = self.write_gate()?;
        if self.enforce_unique {
            let rows = self.storage.taxonomy.read_rows()?;
            if rows.iter().any(|r| r.category == name) {
                return Ok(Creation::AlreadyExists);
            }
        }

        self.storage.taxonomy.append(&TaxonomyRow::bare(name))?;
        info!(category = name, "Created category");
        Ok(Creation::Added)
    }

    /// Add a subcategory under a category
    pub fn create_subcategory(&self, category: &str, name: &str) -> LedgerResult<Creation> {
        let category =
            clean_name(category, "Category").map_err(|e| LedgerError::Validation(e.to_string()))?;
        let name =
            clean_name(name, "Subcategory").map_err(|e| LedgerError::Validation(e.to_string()))?;

        let _gate = self.write_gate()?;
        if self.enforce_unique {
            let rows = self.storage.taxonomy.read_rows()?;
            if rows.iter().any(|r| r.category == category && r.subcategory == name) {
                return Ok(Creation::AlreadyExists);
            }
        }

        self.storage.taxonomy.append(&TaxonomyRow::new(category, name))?;
        info!(category, subcategory = name, "Created subcategory");
        Ok(Creation::Added)
    }

    /// Rename a category on every row that carries it
    ///
    /// Returns the number of rows changed. The table is rewritten in one
    /// bulk write from a snapshot taken under the writer lock; nothing is
    /// written when no row matches.
    pub fn rename(&self, old_name: &str, new_name: &str) -> LedgerResult<usize> {
        let old_name =
            clean_name(old_name, "Category").map_err(|e| LedgerError::Validation(e.to_string()))?;
        let new_name =
            clean_name(new_name, "Category").map_err(|e| LedgerError::Validation(e.to_string()))?;

        let _gate = self.write_gate()?;
        let mut rows = self.storage.taxonomy.read_rows()?;

        let mut changed = 0;
        for row in rows.iter_mut().filter(|r| r.category == old_name) {
            row.category = new_name.to_string();
            changed += 1;
        }

        if changed > 0 {
            self.storage.taxonomy.replace_all(&rows)?;
            info!(from = old_name, to = new_name, rows = changed, "Renamed category");
        }

        Ok(changed)
    }

    /// Delete a category together with all its subcategories
    ///
    /// Returns the number of rows removed; deleting an unknown name writes
    /// nothing.
    pub fn delete(&self, name: &str) -> LedgerResult<usize> {
        let name = clean_name(name, "Category").map_err(|e| LedgerError::Validation(e.to_string()))?;

        let _gate = self.write_gate()?;
        let mut rows = self.storage.taxonomy.read_rows()?;

        let before = rows.len();
        rows.retain(|r| r.category != name);
        let removed = before - rows.len();

        if removed > 0 {
            self.storage.taxonomy.replace_all(&rows)?;
            info!(category = name, rows = removed, "Deleted category");
        }

        Ok(removed)
    }
}
