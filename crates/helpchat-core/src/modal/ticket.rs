//! Ticket modals: status filter, status lookup by id, and the creation form.

use serde_json::{Map, Value, json};
use strum::{EnumIter, IntoEnumIterator};

use super::ModalError;
use crate::payload::SlashPayload;

pub const LIST_TICKETS_INTENT: &str = "list_tickets";
pub const CHECK_STATUS_INTENT: &str = "check_status";
pub const CREATE_TICKET_INTENT: &str = "create_ticket";

/// Helpdesk ticket states, numbered the way the ticketing backend numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum TicketStatus {
    New = 1,
    ProcessingAssigned = 2,
    ProcessingPlanned = 3,
    Pending = 4,
    Solved = 5,
    Closed = 6,
}

impl TicketStatus {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::ProcessingAssigned => "Processing (assigned)",
            TicketStatus::ProcessingPlanned => "Processing (planned)",
            TicketStatus::Pending => "Pending",
            TicketStatus::Solved => "Solved",
            TicketStatus::Closed => "Closed",
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        TicketStatus::iter().find(|status| status.id() == id)
    }
}

/// Six status buttons; picking one is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilterModal {
    pub selected: Option<TicketStatus>,
}

impl TicketFilterModal {
    pub fn statuses() -> impl Iterator<Item = TicketStatus> {
        TicketStatus::iter()
    }

    pub fn submit(&self) -> Result<String, ModalError> {
        let status = self.selected.ok_or(ModalError::StatusRequired)?;
        let mut params = Map::new();
        params.insert("status_id".into(), json!(status.id()));
        Ok(SlashPayload::build(LIST_TICKETS_INTENT, params))
    }
}

/// Single required field: the ticket id to look up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketIdModal {
    pub input: String,
}

impl TicketIdModal {
    pub fn new(prefill: Option<String>) -> Self {
        Self {
            input: prefill.unwrap_or_default(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty()
    }

    pub fn submit(&self) -> Result<String, ModalError> {
        let ticket_id = self.input.trim();
        if ticket_id.is_empty() {
            return Err(ModalError::MissingField("a ticket ID"));
        }
        let mut params = Map::new();
        params.insert("ticket_id".into(), Value::String(ticket_id.to_string()));
        Ok(SlashPayload::build(CHECK_STATUS_INTENT, params))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketFormStage {
    Edit,
    Confirm,
}

/// Ticket creation form: edit, then confirm, then submit or go back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFormModal {
    /// Id of the message whose `ticket_form` opened this modal.
    pub message_id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub priorities: Vec<String>,
    pub stage: TicketFormStage,
}

const DEFAULT_PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

impl TicketFormModal {
    /// Builds the form from a message's `ticket_form` attachment.
    ///
    /// Reads prefilled values from `defaults` (or the top level) and the
    /// allowed priorities from `priorities`, given as strings or `{name}` objects.
    pub fn from_attachment(message_id: impl Into<String>, form: &Value) -> Self {
        let defaults = form.get("defaults").unwrap_or(form);
        let field = |key: &str| {
            defaults
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let mut priorities: Vec<String> = form
            .get("priorities")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        item.as_str()
                            .or_else(|| item.get("name").and_then(Value::as_str))
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        if priorities.is_empty() {
            priorities = DEFAULT_PRIORITIES.iter().map(|p| p.to_string()).collect();
        }

        let mut priority = field("priority");
        if !priorities.contains(&priority) {
            priority = priorities
                .iter()
                .find(|p| p.as_str() == "Medium")
                .unwrap_or(&priorities[0])
                .clone();
        }

        Self {
            message_id: message_id.into(),
            title: field("title"),
            description: field("description"),
            priority,
            priorities,
            stage: TicketFormStage::Edit,
        }
    }

    /// Moves to the confirm step once the form is complete.
    pub fn confirm(&mut self) -> Result<(), ModalError> {
        if self.title.trim().is_empty() {
            return Err(ModalError::MissingField("a ticket title"));
        }
        if self.description.trim().is_empty() {
            return Err(ModalError::MissingField("a description"));
        }
        if !self.priorities.contains(&self.priority) {
            return Err(ModalError::UnknownPriority(self.priority.clone()));
        }
        self.stage = TicketFormStage::Confirm;
        Ok(())
    }

    pub fn back(&mut self) {
        self.stage = TicketFormStage::Edit;
    }

    pub fn submit(&self) -> Result<String, ModalError> {
        if self.stage != TicketFormStage::Confirm {
            return Err(ModalError::NotConfirmed);
        }
        let mut params = Map::new();
        params.insert("title".into(), Value::String(self.title.trim().to_string()));
        params.insert(
            "description".into(),
            Value::String(self.description.trim().to_string()),
        );
        params.insert("priority".into(), Value::String(self.priority.clone()));
        Ok(SlashPayload::build(CREATE_TICKET_INTENT, params))
    }
}
