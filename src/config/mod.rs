//! Configuration module for ledger-bot
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
