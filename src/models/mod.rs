//! Core data models for ledger-bot
//!
//! Typed records for the two tables: taxonomy rows and ledger
//! transactions. Conversion to plain store rows happens only here.

pub mod category;
pub mod transaction;

pub use category::{clean_name, NameValidationError, TaxonomyRow, DEFAULT_TAXONOMY, TAXONOMY_HEADER};
pub use transaction::{parse_amount, Transaction, TransactionKind, LEDGER_HEADER, TIMESTAMP_FORMAT};
