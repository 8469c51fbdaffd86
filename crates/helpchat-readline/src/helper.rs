use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use helpchat_core::modal::SearchKind;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use strum::IntoEnumIterator;

use crate::commands::{self, META_COMMANDS};

/// Intents the backend understands without parameters, plus the popup ones.
const DIRECT_INTENTS: [&str; 8] = [
    "/help",
    "/list_orders",
    "/list_tickets",
    "/check_status",
    "/update_stock",
    "/create_ticket",
    "/admin_me",
    "/admin_token_me",
];

/// Completion, highlighting and hints for slash intents and `:` commands.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        let mut commands: Vec<String> = DIRECT_INTENTS.iter().map(|c| c.to_string()).collect();
        commands.extend(SearchKind::iter().map(|kind| format!("/{}", kind.intent())));
        commands.extend(META_COMMANDS.iter().map(|c| c.to_string()));
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn is_command_line(line: &str) -> bool {
        line.starts_with('/') || line.starts_with(':')
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if Self::is_command_line(line) && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else if line.starts_with(':') || commands::button_ref(line).is_some() {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if Self::is_command_line(line) && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_cover_intents_and_meta() {
        let helper = CliHelper::new();
        assert!(helper.commands.contains(&"/search_products".to_string()));
        assert!(helper.commands.contains(&"/admin_get_customer".to_string()));
        assert!(helper.commands.contains(&":help".to_string()));
        let unique: std::collections::BTreeSet<_> = helper.commands.iter().collect();
        assert_eq!(unique.len(), helper.commands.len());
    }
}
