//! Classification of outgoing user actions.
//!
//! [`classify`] decides, without any I/O, whether an input is sent to the
//! backend as is, opens a modal to collect missing parameters, or is a local
//! command handled by the widget itself.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::modal::{
    ActiveModal, SearchKind, SearchModal, StockUpdateModal, TicketFilterModal, TicketIdModal,
    stock::UPDATE_STOCK_INTENT,
    ticket::{CHECK_STATUS_INTENT, LIST_TICKETS_INTENT},
};
use crate::payload::SlashPayload;

static SET_THEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*set\s+theme\s+(\d+)\s*$").expect("valid theme regex"));

/// What the widget should do with an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Send a slash payload to the backend unchanged.
    SendPayload(SlashPayload),
    /// Send free text to the backend after validation.
    SendText(String),
    /// Open a modal to collect missing parameters first.
    OpenModal(ActiveModal),
    /// Switch the active theme locally.
    SetTheme(i64),
}

/// Parses `set theme <N>`.
pub fn parse_theme_command(input: &str) -> Option<i64> {
    SET_THEME_PATTERN
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// Classifies one user input.
///
/// Popup intents open their modal when any required parameter is missing
/// from the inline JSON, prefilled with whatever is present. A payload that
/// already carries its parameters, like a modal's own submission, is sent.
pub fn classify(input: &str) -> Dispatch {
    if let Some(theme_id) = parse_theme_command(input) {
        return Dispatch::SetTheme(theme_id);
    }

    let Some(payload) = SlashPayload::parse(input) else {
        return Dispatch::SendText(input.trim().to_string());
    };

    let modal = match payload.intent.as_str() {
        LIST_TICKETS_INTENT if !payload.has_param("status_id") => {
            Some(ActiveModal::TicketFilter(TicketFilterModal::default()))
        }
        CHECK_STATUS_INTENT if !payload.has_param("ticket_id") => {
            Some(ActiveModal::TicketId(TicketIdModal::new(None)))
        }
        UPDATE_STOCK_INTENT
            if !(payload.has_param("product_id") && payload.has_param("stock_quantity")) =>
        {
            Some(ActiveModal::StockUpdate(StockUpdateModal::new(
                payload.param_str("product_id"),
                payload.param_str("stock_quantity"),
            )))
        }
        intent => SearchKind::for_intent(intent)
            .filter(|kind| !payload.has_param(kind.param()))
            .map(|kind| ActiveModal::Search(SearchModal::new(kind, None))),
    };

    match modal {
        Some(modal) => {
            debug!("/{} needs parameters, opening {} modal", payload.intent, modal.kind());
            Dispatch::OpenModal(modal)
        }
        None => Dispatch::SendPayload(payload),
    }
}
