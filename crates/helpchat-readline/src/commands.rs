//! Local REPL commands that never reach the backend.
//!
//! Lines starting with `:` or `#` are parsed here; everything else is handed
//! to the widget as user input. Messages are addressed by the 1-based index
//! printed next to them.

use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow, bail};
use helpchat_core::message::{Button, Message};
use helpchat_core::modal::SearchKind;
use helpchat_core::session::FeedbackVote;

pub const META_COMMANDS: [&str; 12] = [
    ":help", ":clear", ":search", ":ticket", ":up", ":down", ":invoice", ":set", ":privacy",
    ":theme", ":history", ":modal",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Clear,
    /// `#N`: click button N of the latest message with buttons.
    Button(usize),
    Search(SearchKind),
    /// Open the ticket form attached to message N.
    TicketForm(usize),
    Vote(usize, FeedbackVote),
    Invoice(usize, Option<PathBuf>),
    SetAttribute(String, String),
    DismissPrivacy,
    Theme,
    History,
    /// Re-enter the modal left open.
    Modal,
}

/// Parses a local command; `Ok(None)` means the line is chat input.
pub fn parse(line: &str) -> Result<Option<MetaCommand>> {
    let line = line.trim();

    if let Some(digits) = button_ref(line) {
        return Ok(Some(MetaCommand::Button(index(digits)?)));
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(None);
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("help", []) => MetaCommand::Help,
        ("clear", []) => MetaCommand::Clear,
        ("search", [kind]) => MetaCommand::Search(
            kind.parse()
                .map_err(|_| anyhow!("unknown search '{}' (try {})", kind, search_kinds()))?,
        ),
        ("ticket", [n]) => MetaCommand::TicketForm(index(n)?),
        ("up" | "down", [n]) => MetaCommand::Vote(index(n)?, name.parse()?),
        ("invoice", [n]) => MetaCommand::Invoice(index(n)?, None),
        ("invoice", [n, dir]) => MetaCommand::Invoice(index(n)?, Some(PathBuf::from(dir))),
        ("set", [attribute, value @ ..]) if !value.is_empty() => {
            MetaCommand::SetAttribute(attribute.to_string(), value.join(" "))
        }
        ("privacy", []) => MetaCommand::DismissPrivacy,
        ("theme", []) => MetaCommand::Theme,
        ("history", []) => MetaCommand::History,
        ("modal", []) => MetaCommand::Modal,
        _ => bail!("unknown or malformed command ':{}', type :help", rest.trim()),
    };
    Ok(Some(command))
}

/// The digits of a `#N` button pick. Any other `#...` line is chat text.
pub fn button_ref(line: &str) -> Option<&str> {
    line.strip_prefix('#')
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn index(raw: &str) -> Result<usize> {
    let n: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", raw.trim()))?;
    if n == 0 {
        bail!("numbering starts at 1");
    }
    Ok(n)
}

fn search_kinds() -> String {
    use strum::IntoEnumIterator;
    SearchKind::iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Buttons of the most recent message that has any.
pub fn latest_buttons(messages: &[Message]) -> &[Button] {
    messages
        .iter()
        .rev()
        .find(|message| !message.buttons.is_empty())
        .map(|message| message.buttons.as_slice())
        .unwrap_or_default()
}

/// Id of the message shown as number `n`.
pub fn message_id(messages: &[Message], n: usize) -> Result<String> {
    messages
        .get(n - 1)
        .map(|message| message.id.clone())
        .ok_or_else(|| anyhow!("there is no message {}", n))
}

pub fn usage() -> String {
    [
        "  <text>              send a message (slash payloads like /help work too)",
        "  #N                  click button N of the latest buttons",
        "  :search <kind>      open a search form",
        "  :ticket N           open the ticket form of message N",
        "  :up N | :down N     rate bot message N",
        "  :invoice N [dir]    save the invoice PDF of message N",
        "  :set <attr> <value> change title, app-id or theme-id",
        "  :privacy            dismiss the privacy notice",
        "  :theme              show the active theme",
        "  :history            print the whole conversation",
        "  :modal              return to an open form",
        "  :clear              start a new conversation",
        "  set theme <N>       switch to theme N",
        "  quit | exit         leave",
    ]
    .join("\n")
        + &format!("\n  search kinds: {}", search_kinds())
}
