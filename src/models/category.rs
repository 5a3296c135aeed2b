//! Taxonomy row model
//!
//! The taxonomy is a flat table of (category, subcategory) pairs. A category
//! with no subcategories yet is represented by a single row whose
//! subcategory is empty. Columns past the second are not interpreted but
//! travel with their row, so table rewrites keep them.

use std::fmt;

/// Header row that always leads the taxonomy table
pub const TAXONOMY_HEADER: [&str; 2] = ["Category", "Subcategory"];

/// Taxonomy seeded into an empty table
pub const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    ("Food", &["Groceries", "Cafe"]),
    ("Transport", &["Metro", "Taxi"]),
    ("Communication", &["Mobile", "Internet"]),
    ("Utilities", &["Electricity", "Water", "Gas"]),
    ("Entertainment", &["Cinema", "Games", "Leisure"]),
];

/// One (category, subcategory) row of the taxonomy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyRow {
    pub category: String,

    /// Empty when the row only records that the category exists
    pub subcategory: String,

    /// Any further columns, written back unchanged
    pub extra: Vec<String>,
}

impl TaxonomyRow {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            extra: Vec::new(),
        }
    }

    /// Row marking a category that has no subcategories yet
    pub fn bare(category: impl Into<String>) -> Self {
        Self::new(category, "")
    }

    pub fn has_subcategory(&self) -> bool {
        !self.subcategory.is_empty()
    }

    /// Convert to the store's plain row representation
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![self.category.clone(), self.subcategory.clone()];
        fields.extend(self.extra.iter().cloned());
        fields
    }

    /// Build from a store row; a missing second column reads as empty
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let category = fields.first()?;
        let subcategory = fields.get(1).cloned().unwrap_or_default();
        Some(Self {
            category: category.clone(),
            subcategory,
            extra: fields.iter().skip(2).cloned().collect(),
        })
    }

    /// Rows for the default taxonomy, in seeding order
    pub fn defaults() -> Vec<Self> {
        DEFAULT_TAXONOMY
            .iter()
            .flat_map(|(category, subs)| subs.iter().map(move |sub| Self::new(*category, *sub)))
            .collect()
    }
}

impl fmt::Display for TaxonomyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.category, self.subcategory)
    }
}

/// Validation errors for category and subcategory names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    EmptyName(&'static str),
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName(what) => write!(f, "{} name cannot be empty", what),
        }
    }
}

impl std::error::Error for NameValidationError {}

/// Trim a user-supplied name and reject it if nothing is left
pub fn clean_name<'a>(name: &'a str, what: &'static str) -> Result<&'a str, NameValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameValidationError::EmptyName(what));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_five_categories() {
        let rows = TaxonomyRow::defaults();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], TaxonomyRow::new("Food", "Groceries"));

        let mut categories: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        categories.dedup();
        assert_eq!(categories.len(), 5);
    }

    #[test]
    fn test_from_fields_pads_missing_subcategory() {
        let row = TaxonomyRow::from_fields(&["Pets".to_string()]).unwrap();
        assert_eq!(row, TaxonomyRow::bare("Pets"));
        assert!(!row.has_subcategory());

        assert!(TaxonomyRow::from_fields(&[]).is_none());
    }

    #[test]
    fn test_extra_columns_round_trip() {
        let fields: Vec<String> = ["Food", "Cafe", "note", ""].iter().map(|f| f.to_string()).collect();

        let row = TaxonomyRow::from_fields(&fields).unwrap();
        assert_eq!(row.extra, vec!["note".to_string(), String::new()]);
        assert_eq!(row.to_fields(), fields);
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Pets ", "Category").unwrap(), "Pets");
        assert_eq!(
            clean_name("   ", "Category").unwrap_err().to_string(),
            "Category name cannot be empty"
        );
    }
}
