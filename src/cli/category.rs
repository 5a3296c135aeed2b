//! Category CLI commands
//!
//! Taxonomy management from the terminal, through the same service the
//! chat dialogues use.

use clap::Subcommand;

use crate::display::format_category_tree;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{Creation, TaxonomyService};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with their subcategories
    List,

    /// Add a category, or a subcategory under it with --sub
    Add {
        /// Category name
        name: String,
        /// Subcategory name
        #[arg(short, long)]
        sub: Option<String>,
    },

    /// Rename a category on every row that carries it
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a category and all of its subcategories
    Delete {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(service: &TaxonomyService, cmd: CategoryCommands) -> LedgerResult<()> {
    match cmd {
        CategoryCommands::List => {
            let listings = service.list_grouped()?;
            print!("{}", format_category_tree(&listings));
        }

        CategoryCommands::Add { name, sub: None } => match service.create_category(&name)? {
            Creation::Added => println!("Created category: {}", name.trim()),
            Creation::AlreadyExists => println!("Category '{}' already exists", name.trim()),
        },

        CategoryCommands::Add {
            name,
            sub: Some(sub),
        } => match service.create_subcategory(&name, &sub)? {
            Creation::Added => println!("Created subcategory: {} / {}", name.trim(), sub.trim()),
            Creation::AlreadyExists => {
                println!("Subcategory '{} / {}' already exists", name.trim(), sub.trim())
            }
        },

        CategoryCommands::Rename { old, new } => {
            let changed = service.rename(&old, &new)?;
            if changed == 0 {
                return Err(LedgerError::category_not_found(&old));
            }
            println!("Renamed '{}' to '{}' ({} rows)", old.trim(), new.trim(), changed);
        }

        CategoryCommands::Delete { name } => {
            let removed = service.delete(&name)?;
            if removed == 0 {
                return Err(LedgerError::category_not_found(&name));
            }
            println!("Deleted category: {} ({} rows)", name.trim(), removed);
        }
    }

    Ok(())
}
