//! Category display formatting
//!
//! Formats the taxonomy for chat replies and terminal output.

use crate::services::CategoryListing;

/// Format categories as "Category: sub, sub" lines
pub fn format_category_listing(listings: &[CategoryListing]) -> String {
    if listings.is_empty() {
        return "No categories yet.".to_string();
    }

    let mut output = String::from("📂 *Categories and subcategories:*\n");
    for listing in listings {
        output.push_str(&format!("\n*{}*", listing.name));
        if !listing.subcategories.is_empty() {
            output.push_str(&format!(": {}", listing.subcategories.join(", ")));
        }
    }

    output
}

/// Format categories as an indented tree for the terminal
pub fn format_category_tree(listings: &[CategoryListing]) -> String {
    if listings.is_empty() {
        return "No categories found.\n\nRun 'ledger-bot init' to create default categories."
            .to_string();
    }

    let mut output = String::new();
    for listing in listings {
        output.push_str(&format!("{}\n", listing.name));

        if listing.subcategories.is_empty() {
            output.push_str("  (no subcategories)\n");
        } else {
            for (j, sub) in listing.subcategories.iter().enumerate() {
                let prefix = if j == listing.subcategories.len() - 1 {
                    "└── "
                } else {
                    "├── "
                };
                output.push_str(&format!("  {}{}\n", prefix, sub));
            }
        }
    }

    output
}
