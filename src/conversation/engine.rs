//! Conversation engine
//!
//! Drives the per-user dialogues:
//!
//! ```text
//! Idle → Category → [NewCategory] → Subcategory → [NewSubcategory] → Amount → Idle
//! Idle → RenameOld → RenameNew → Idle
//! Idle → DeleteTarget → Idle
//! ```
//!
//! Every step yields exactly one message. Terminal steps clear the session.
//! A transition is computed from a copy of the session and stored only after
//! every store call it needs has succeeded, so a store failure leaves the
//! user where they were.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, SubsecRound};
use tracing::{debug, info};

use crate::display::report::format_amount;
use crate::error::LedgerResult;
use crate::models::{clean_name, parse_amount, Transaction, TransactionKind};
use crate::services::{Creation, TaxonomyService};
use crate::storage::Storage;

use super::message::{Outgoing, NEW_CATEGORY, NEW_SUBCATEGORY};
use super::session::{Sender, Session, SessionMap, UserId};

/// Source of transaction timestamps
pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// A dialogue that can be started from idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Transaction(TransactionKind),
    Rename,
    Delete,
}

/// Next session (None = back to idle) plus the single reply
struct Transition {
    next: Option<Session>,
    reply: Outgoing,
}

impl Transition {
    fn to(next: Session, reply: Outgoing) -> Self {
        Self {
            next: Some(next),
            reply,
        }
    }

    fn end(reply: Outgoing) -> Self {
        Self { next: None, reply }
    }
}

pub struct ConversationEngine {
    storage: Arc<Storage>,
    taxonomy: Arc<TaxonomyService>,
    sessions: SessionMap,
    currency_symbol: String,
    clock: Clock,
}

impl ConversationEngine {
    pub fn new(storage: Arc<Storage>, taxonomy: Arc<TaxonomyService>) -> Self {
        Self {
            storage,
            taxonomy,
            sessions: SessionMap::new(),
            currency_symbol: String::new(),
            clock: Box::new(|| Local::now().naive_local().trunc_subsecs(0)),
        }
    }

    /// Currency symbol shown after amounts in confirmations
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Replace the wall clock used to stamp transactions
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn taxonomy(&self) -> &Arc<TaxonomyService> {
        &self.taxonomy
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Current time according to the engine's clock
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn has_session(&self, user: UserId) -> bool {
        self.sessions.get(user).is_some()
    }

    pub fn session(&self, user: UserId) -> Option<Session> {
        self.sessions.get(user)
    }

    /// Number of users with a dialogue in progress
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drop the user's session; returns whether one existed
    pub fn cancel(&self, user: UserId) -> bool {
        self.sessions
            .update(user, false, |current| current.take().is_some())
            .unwrap_or(false)
    }

    /// Start a dialogue, replacing any session the user already had
    pub fn begin(&self, sender: &Sender, flow: Flow) -> LedgerResult<Vec<Outgoing>> {
        let started = self.sessions.update(sender.id, true, |current| -> LedgerResult<Vec<Outgoing>> {
            let transition = match flow {
                Flow::Transaction(kind) => {
                    let mut choices = self.taxonomy.list_categories()?;
                    choices.push(NEW_CATEGORY.to_string());
                    Transition::to(
                        Session::Category { kind },
                        Outgoing::with_choices("Choose a category:", choices),
                    )
                }
                Flow::Rename => Transition::to(
                    Session::RenameOld,
                    Outgoing::text("Enter the name of the category to rename:"),
                ),
                Flow::Delete => Transition::to(
                    Session::DeleteTarget,
                    Outgoing::text("Enter the name of the category to delete:"),
                ),
            };

            debug!(user = %sender.id, ?flow, "Starting dialogue");
            *current = transition.next;
            Ok(vec![transition.reply])
        });

        started.unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Feed the user's next message into their active dialogue
    ///
    /// Text from a user with no session is ignored and yields no messages.
    pub fn handle(&self, sender: &Sender, text: &str) -> LedgerResult<Vec<Outgoing>> {
        let handled = self.sessions.update(sender.id, false, |current| -> LedgerResult<Vec<Outgoing>> {
            let Some(session) = current.clone() else {
                return Ok(Vec::new());
            };

            let step = session.step();
            let transition = self.advance(sender, session, text)?;
            debug!(
                user = %sender.id,
                from = ?step,
                to = ?transition.next.as_ref().map(Session::step),
                "Session advanced"
            );

            *current = transition.next;
            Ok(vec![transition.reply])
        });

        handled.unwrap_or_else(|| {
            debug!(user = %sender.id, "No active session, ignoring text");
            Ok(Vec::new())
        })
    }

    fn advance(&self, sender: &Sender, session: Session, text: &str) -> LedgerResult<Transition> {
        match session {
            Session::Category { kind } => {
                if text.trim() == NEW_CATEGORY {
                    return Ok(Transition::to(
                        Session::NewCategory { kind },
                        Outgoing::text("Enter the new category name:"),
                    ));
                }
                match clean_name(text, "Category") {
                    Ok(category) => self.offer_subcategories(kind, category.to_string(), None),
                    Err(e) => Ok(rejected(e)),
                }
            }

            Session::NewCategory { kind } => {
                let name = match clean_name(text, "Category") {
                    Ok(name) => name,
                    Err(e) => return Ok(rejected(e)),
                };
                let note = match self.taxonomy.create_category(name)? {
                    Creation::Added => format!("Category '{}' added.", name),
                    Creation::AlreadyExists => format!("Category '{}' already exists.", name),
                };
                self.offer_subcategories(kind, name.to_string(), Some(note))
            }

            Session::Subcategory { kind, category } => {
                if text.trim() == NEW_SUBCATEGORY {
                    return Ok(Transition::to(
                        Session::NewSubcategory { kind, category },
                        Outgoing::text("Enter the new subcategory name:"),
                    ));
                }
                Ok(Transition::to(
                    Session::Amount {
                        kind,
                        category,
                        subcategory: text.trim().to_string(),
                    },
                    Outgoing::text("Enter the amount:"),
                ))
            }

            Session::NewSubcategory { kind, category } => {
                let name = match clean_name(text, "Subcategory") {
                    Ok(name) => name,
                    Err(e) => return Ok(rejected(e)),
                };
                let note = match self.taxonomy.create_subcategory(&category, name)? {
                    Creation::Added => format!("Subcategory '{}' added.", name),
                    Creation::AlreadyExists => format!("Subcategory '{}' already exists.", name),
                };
                Ok(Transition::to(
                    Session::Amount {
                        kind,
                        category,
                        subcategory: name.to_string(),
                    },
                    Outgoing::text(format!("{}\nEnter the amount:", note)),
                ))
            }

            Session::Amount {
                kind,
                category,
                subcategory,
            } => {
                let amount = match parse_amount(text) {
                    Ok(amount) => amount,
                    Err(e) => {
                        debug!(user = %sender.id, error = %e, "Rejected amount");
                        return Ok(Transition::end(Outgoing::text(
                            "❗ Enter the amount as a number, for example: 250",
                        )));
                    }
                };

                let transaction =
                    Transaction::new((self.clock)(), kind, amount, category, subcategory, &sender.name);
                self.storage.ledger.append(&transaction)?;
                info!(
                    user = %sender.id,
                    kind = kind.token(),
                    amount,
                    key = %transaction.group_key(),
                    "Recorded transaction"
                );

                Ok(Transition::end(Outgoing::text(format!(
                    "✅ {} of {} in '{}' recorded.",
                    kind,
                    format_amount(amount, &self.currency_symbol),
                    transaction.group_key()
                ))))
            }

            Session::RenameOld => match clean_name(text, "Category") {
                Ok(old_name) => Ok(Transition::to(
                    Session::RenameNew {
                        old_name: old_name.to_string(),
                    },
                    Outgoing::text(format!("Enter the new name for category '{}':", old_name)),
                )),
                Err(e) => Ok(rejected(e)),
            },

            Session::RenameNew { old_name } => {
                let new_name = match clean_name(text, "Category") {
                    Ok(name) => name,
                    Err(e) => return Ok(rejected(e)),
                };
                let reply = if self.taxonomy.rename(&old_name, new_name)? > 0 {
                    format!("✅ Category '{}' renamed to '{}'.", old_name, new_name)
                } else {
                    format!("Category '{}' not found.", old_name)
                };
                Ok(Transition::end(Outgoing::text(reply)))
            }

            Session::DeleteTarget => {
                let name = match clean_name(text, "Category") {
                    Ok(name) => name,
                    Err(e) => return Ok(rejected(e)),
                };
                let reply = if self.taxonomy.delete(name)? > 0 {
                    format!("🗑 Category '{}' deleted.", name)
                } else {
                    format!("Category '{}' not found.", name)
                };
                Ok(Transition::end(Outgoing::text(reply)))
            }
        }
    }

    fn offer_subcategories(
        &self,
        kind: TransactionKind,
        category: String,
        note: Option<String>,
    ) -> LedgerResult<Transition> {
        let mut choices = self.taxonomy.list_subcategories(&category)?;
        choices.push(NEW_SUBCATEGORY.to_string());

        let text = match note {
            Some(note) => format!("{}\nChoose a subcategory:", note),
            None => "Choose a subcategory:".to_string(),
        };

        Ok(Transition::to(
            Session::Subcategory { kind, category },
            Outgoing::with_choices(text, choices),
        ))
    }
}

/// Terminal reply for input that failed validation
fn rejected(err: impl std::fmt::Display) -> Transition {
    Transition::end(Outgoing::text(format!("❗ {}.", err)))
}
