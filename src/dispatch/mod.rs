//! Message dispatcher
//!
//! Front door for inbound chat text. Screens each message, routes menu
//! commands and buttons, and hands everything else to the conversation
//! engine. The engine never sees command text.

pub mod filter;

use tracing::{info, warn};

use crate::config::Settings;
use crate::conversation::{ConversationEngine, Flow, Outgoing, Sender};
use crate::display::{format_category_listing, format_monthly_outcome};
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionKind;
use crate::reports::{MonthlyReport, ReportRequest};

pub use filter::{MessageFilter, Verdict};

pub const EXPENSE_BUTTON: &str = "💸 Expense";
pub const INCOME_BUTTON: &str = "💰 Income";
pub const CATEGORIES_BUTTON: &str = "📂 Categories";
pub const REPORT_BUTTON: &str = "📊 Report";
pub const MANAGE_BUTTON: &str = "⚙ Manage";
pub const RENAME_BUTTON: &str = "Rename";
pub const DELETE_BUTTON: &str = "Delete";
pub const BACK_BUTTON: &str = "🔙 Back";

/// A recognized menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Welcome,
    Begin(Flow),
    Categories,
    CurrentReport,
    Report,
    Manage,
}

impl Command {
    /// Recognize a command or menu button; `None` means dialogue input
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let head = text.split_whitespace().next().unwrap_or_default();

        match text {
            "/start" | "/help" | BACK_BUTTON => return Some(Command::Welcome),
            "/expense" | EXPENSE_BUTTON => {
                return Some(Command::Begin(Flow::Transaction(TransactionKind::Expense)))
            }
            "/income" | INCOME_BUTTON => {
                return Some(Command::Begin(Flow::Transaction(TransactionKind::Income)))
            }
            "/categories" | CATEGORIES_BUTTON => return Some(Command::Categories),
            "/manage" | MANAGE_BUTTON => return Some(Command::Manage),
            "/rename" | RENAME_BUTTON => return Some(Command::Begin(Flow::Rename)),
            "/delete" | DELETE_BUTTON => return Some(Command::Begin(Flow::Delete)),
            _ => {}
        }

        if text.starts_with(REPORT_BUTTON) {
            return Some(Command::CurrentReport);
        }

        (head == "/report").then_some(Command::Report)
    }
}

fn main_menu() -> Vec<String> {
    [
        EXPENSE_BUTTON,
        INCOME_BUTTON,
        CATEGORIES_BUTTON,
        REPORT_BUTTON,
        MANAGE_BUTTON,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub struct Dispatcher {
    engine: ConversationEngine,
    filter: MessageFilter,
}

impl Dispatcher {
    pub fn new(engine: ConversationEngine, filter: MessageFilter) -> Self {
        Self { engine, filter }
    }

    pub fn from_settings(engine: ConversationEngine, settings: &Settings) -> Self {
        Self::new(engine, MessageFilter::from_settings(settings))
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    /// Handle one inbound message and return the replies to send
    pub fn handle(&self, sender: &Sender, text: &str) -> LedgerResult<Vec<Outgoing>> {
        info!(user = %sender.id, name = %sender.name, text, "Inbound message");

        match self.filter.check(sender, text) {
            Verdict::Pass => {}
            Verdict::Denied => {
                warn!(user = %sender.id, name = %sender.name, "Rejected message from user not on the allow-list");
                return Ok(vec![Outgoing::text("⛔ Access denied.")]);
            }
            Verdict::Spam => {
                warn!(user = %sender.id, name = %sender.name, text, "Blocked suspicious message");
                return Ok(vec![Outgoing::text("🚫 Message blocked as suspicious.")]);
            }
        }

        let Some(command) = Command::parse(text) else {
            return self.engine.handle(sender, text);
        };

        match command {
            Command::Welcome => Ok(vec![Outgoing::with_choices(
                "👋 Hi! I keep track of your expenses and income.\n\
                 Pick an action below, or send /report YYYY-MM for a monthly summary.",
                main_menu(),
            )]),
            Command::Begin(flow) => self.engine.begin(sender, flow),
            Command::Categories => {
                let listings = self.engine.taxonomy().list_grouped()?;
                Ok(vec![Outgoing::text(format_category_listing(&listings))])
            }
            Command::CurrentReport => {
                let month = self.engine.now().format("%Y-%m").to_string();
                self.report(&month)
            }
            Command::Report => match ReportRequest::parse(text) {
                Ok(request) => self.report(&request.month),
                Err(LedgerError::MalformedReportRequest { usage }) => Ok(vec![Outgoing::text(
                    format!("❗ Use the format: {}", usage),
                )]),
                Err(e) => Err(e),
            },
            Command::Manage => Ok(vec![Outgoing::with_choices(
                "What would you like to do?",
                vec![
                    RENAME_BUTTON.to_string(),
                    DELETE_BUTTON.to_string(),
                    BACK_BUTTON.to_string(),
                ],
            )]),
        }
    }

    fn report(&self, month: &str) -> LedgerResult<Vec<Outgoing>> {
        let outcome = MonthlyReport::generate(&self.engine.storage().ledger, month)?;
        Ok(vec![Outgoing::text(format_monthly_outcome(
            &outcome,
            self.engine.currency_symbol(),
        ))])
    }
}
