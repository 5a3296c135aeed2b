//! Inbound message screening
//!
//! Runs before any command routing: an allow-list of user ids, then a
//! case-insensitive keyword match for spam.

use crate::config::Settings;
use crate::conversation::Sender;

/// Outcome of screening one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Denied,
    Spam,
}

#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    allowed_users: Vec<i64>,
    /// Stored lowercased
    spam_keywords: Vec<String>,
}

impl MessageFilter {
    pub fn new(allowed_users: Vec<i64>, spam_keywords: &[String]) -> Self {
        Self {
            allowed_users,
            spam_keywords: spam_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.allowed_users.clone(), &settings.spam_keywords)
    }

    pub fn check(&self, sender: &Sender, text: &str) -> Verdict {
        if !self.allowed_users.is_empty() && !self.allowed_users.contains(&sender.id.0) {
            return Verdict::Denied;
        }

        if self.is_spam(text) {
            return Verdict::Spam;
        }

        Verdict::Pass
    }

    pub fn is_spam(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.spam_keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_pass_everyone() {
        let filter = MessageFilter::from_settings(&Settings::default());
        assert_eq!(filter.check(&Sender::new(5, "ann"), "Food"), Verdict::Pass);
    }

    #[test]
    fn test_allow_list() {
        let filter = MessageFilter::new(vec![1], &[]);
        assert_eq!(filter.check(&Sender::new(1, "ann"), "hi"), Verdict::Pass);
        assert_eq!(filter.check(&Sender::new(2, "bob"), "hi"), Verdict::Denied);
    }

    #[test]
    fn test_spam_is_case_insensitive() {
        let filter = MessageFilter::from_settings(&Settings::default());
        let sender = Sender::new(1, "ann");

        assert_eq!(filter.check(&sender, "Free AIRDROP now"), Verdict::Spam);
        assert_eq!(filter.check(&sender, "see https://example.com"), Verdict::Spam);
        assert_eq!(filter.check(&sender, "Groceries"), Verdict::Pass);
    }

    #[test]
    fn test_denied_wins_over_spam() {
        let filter = MessageFilter::new(vec![1], &["giveaway".to_string()]);
        assert_eq!(filter.check(&Sender::new(9, "x"), "giveaway"), Verdict::Denied);
    }
}
