//! User settings for ledger-bot
//!
//! Manages the currency label, taxonomy uniqueness policy, and the
//! message filters applied in front of the conversation engine.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// Settings for ledger-bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol appended to amounts in replies
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Skip appending a category or subcategory that already exists.
    /// When false, creation appends unconditionally and duplicates are possible.
    #[serde(default = "default_enforce_unique_names")]
    pub enforce_unique_names: bool,

    /// User ids allowed to talk to the bot; empty allows everyone
    #[serde(default)]
    pub allowed_users: Vec<i64>,

    /// Case-insensitive substrings that mark a message as spam
    #[serde(default = "default_spam_keywords")]
    pub spam_keywords: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_enforce_unique_names() -> bool {
    true
}

fn default_spam_keywords() -> Vec<String> {
    ["airdrop", "freeether", "claim eth", "giveaway", "http://", "https://"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            enforce_unique_names: default_enforce_unique_names(),
            allowed_users: Vec::new(),
            spam_keywords: default_spam_keywords(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(settings.enforce_unique_names);
        assert!(settings.allowed_users.is_empty());
        assert!(settings.spam_keywords.iter().any(|k| k == "airdrop"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.enforce_unique_names = false;
        settings.allowed_users = vec![42];
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.enforce_unique_names);
        assert_eq!(loaded.allowed_users, vec![42]);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert!(settings.enforce_unique_names);
        assert_eq!(settings.spam_keywords.len(), 6);
    }
}
