//! Outgoing messages
//!
//! A reply is plain text plus an optional list of choices. How choices are
//! shown (keyboard buttons, a numbered list) is up to the renderer.

use std::fmt;

/// Choice that starts creating a category
pub const NEW_CATEGORY: &str = "➕ New category";

/// Choice that starts creating a subcategory
pub const NEW_SUBCATEGORY: &str = "➕ New subcategory";

/// One message sent back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub text: String,
    pub choices: Vec<String>,
}

impl Outgoing {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }

    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}

impl fmt::Display for Outgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        for choice in &self.choices {
            write!(f, "\n  [{}]", choice)?;
        }
        Ok(())
    }
}
