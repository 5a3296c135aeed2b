//! Display formatting for chat and terminal output
//!
//! Turns taxonomy listings and reports into text.

pub mod category;
pub mod report;

pub use category::{format_category_listing, format_category_tree};
pub use report::{format_amount, format_monthly_outcome, format_monthly_report};
