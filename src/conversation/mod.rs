//! Conversation state machine
//!
//! Tracks each user's progress through transaction entry and category
//! management dialogues.

pub mod engine;
pub mod message;
pub mod session;

pub use engine::{Clock, ConversationEngine, Flow};
pub use message::{Outgoing, NEW_CATEGORY, NEW_SUBCATEGORY};
pub use session::{Sender, Session, SessionMap, Step, UserId};
