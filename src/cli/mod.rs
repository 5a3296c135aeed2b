//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod chat;
pub mod report;

pub use category::{handle_category_command, CategoryCommands};
pub use chat::run_chat;
pub use report::handle_report_command;
