//! Service layer for ledger-bot
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and the consistency rules of the taxonomy.

pub mod taxonomy;

pub use taxonomy::{CategoryListing, Creation, TaxonomyService};
