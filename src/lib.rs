//! ledger-bot - Conversational expense and income ledger
//!
//! Users record expenses and income through a short guided dialogue,
//! maintain a two-level category taxonomy, and ask for monthly summaries.
//! The taxonomy and the ledger are two plain tables behind a small storage
//! trait, backed by CSV files on disk.
//!
//! # Architecture
//!
//! - `config`: Paths and settings
//! - `error`: Custom error types
//! - `models`: Taxonomy rows and ledger transactions
//! - `storage`: Tabular store trait, CSV and in-memory backends, table adapters
//! - `services`: Taxonomy management
//! - `conversation`: Per-user dialogue state machine
//! - `reports`: Monthly aggregation
//! - `display`: Text rendering for chat and terminal
//! - `dispatch`: Message screening and menu routing
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_bot::config::{LedgerPaths, Settings};
//! use ledger_bot::storage::{initialize_storage, Storage};
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! initialize_storage(&storage)?;
//! ```

pub mod cli;
pub mod config;
pub mod conversation;
pub mod display;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
