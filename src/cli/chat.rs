//! Terminal chat session
//!
//! Feeds stdin lines through the dispatcher as if they were chat messages.
//! Choices are printed as a numbered list and can be picked by number.

use std::io::{BufRead, Write};

use tracing::error;

use crate::conversation::{Outgoing, Sender};
use crate::dispatch::Dispatcher;
use crate::error::LedgerResult;

/// Map a bare number onto the matching choice of the last reply
fn resolve_choice<'a>(input: &'a str, choices: &'a [String]) -> &'a str {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= choices.len() => &choices[n - 1],
        _ => input,
    }
}

fn render<W: Write>(output: &mut W, message: &Outgoing) -> LedgerResult<()> {
    writeln!(output, "{}", message.text)?;
    for (i, choice) in message.choices.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, choice)?;
    }
    Ok(())
}

/// Run the chat loop until `input` is exhausted
pub fn run_chat<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    sender: &Sender,
    input: R,
    output: &mut W,
) -> LedgerResult<()> {
    let mut choices: Vec<String> = Vec::new();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let text = resolve_choice(&line, &choices).to_string();
        match dispatcher.handle(sender, &text) {
            Ok(replies) => {
                // Keep the previous choices when nothing new was offered
                if let Some(last) = replies.last() {
                    choices = last.choices.clone();
                }
                for reply in &replies {
                    render(output, reply)?;
                }
            }
            Err(e) => {
                error!(user = %sender.id, error = %e, "Failed to handle message");
                writeln!(output, "⚠ {}", e)?;
            }
        }
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::conversation::ConversationEngine;
    use crate::services::TaxonomyService;
    use crate::storage::{initialize_storage, Storage};
    use std::io::Cursor;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        let storage = Arc::new(Storage::in_memory());
        initialize_storage(&storage).unwrap();
        let taxonomy = Arc::new(TaxonomyService::new(storage.clone(), true));
        let engine = ConversationEngine::new(storage, taxonomy).with_currency("$");
        Dispatcher::from_settings(engine, &Settings::default())
    }

    fn run(d: &Dispatcher, script: &str) -> String {
        let mut out = Vec::new();
        run_chat(d, &Sender::new(1, "ann"), Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_resolve_choice() {
        let choices = vec!["Food".to_string(), "Transport".to_string()];
        assert_eq!(resolve_choice("2", &choices), "Transport");
        assert_eq!(resolve_choice("3", &choices), "3");
        assert_eq!(resolve_choice("250", &[]), "250");
    }

    #[test]
    fn test_numbered_expense_entry() {
        let d = dispatcher();
        let out = run(&d, "/expense\n1\n2\n250\n");

        assert!(out.contains("  1) Food"));
        assert!(out.contains("in 'Food / Cafe' recorded."));
        assert_eq!(d.engine().storage().ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let out = run(&dispatcher(), "\n\n/report 2099-01\n");
        assert_eq!(out, "No data for 2099-01\n");
    }
}
