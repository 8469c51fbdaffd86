//! Modal (popup) state machines.
//!
//! Each modal collects the parameters one command is missing and turns them
//! into a slash payload. A widget holds at most one [`ActiveModal`] at a time;
//! every flow is `closed -> open -> (submit | cancel) -> closed`, and the
//! ticket form additionally passes through a confirm step.

pub mod search;
pub mod stock;
pub mod ticket;

use strum::{Display, EnumString};
use thiserror::Error;

pub use search::{SearchKind, SearchModal};
pub use stock::StockUpdateModal;
pub use ticket::{TicketFilterModal, TicketFormModal, TicketFormStage, TicketIdModal, TicketStatus};

/// Reasons a modal refuses to submit. Shown to the user as a bot warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("Please enter {0}.")]
    MissingField(&'static str),
    #[error("Quantity must be a whole number (digits only).")]
    InvalidQuantity,
    #[error("Please choose a ticket status.")]
    StatusRequired,
    #[error("Please review the ticket before submitting.")]
    NotConfirmed,
    #[error("Unknown priority '{0}'.")]
    UnknownPriority(String),
}

/// Discriminant of [`ActiveModal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ModalKind {
    TicketFilter,
    TicketId,
    Search,
    StockUpdate,
    TicketForm,
}

/// The single modal slot of a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveModal {
    TicketFilter(TicketFilterModal),
    TicketId(TicketIdModal),
    Search(SearchModal),
    StockUpdate(StockUpdateModal),
    TicketForm(TicketFormModal),
}

impl ActiveModal {
    pub fn kind(&self) -> ModalKind {
        match self {
            ActiveModal::TicketFilter(_) => ModalKind::TicketFilter,
            ActiveModal::TicketId(_) => ModalKind::TicketId,
            ActiveModal::Search(_) => ModalKind::Search,
            ActiveModal::StockUpdate(_) => ModalKind::StockUpdate,
            ActiveModal::TicketForm(_) => ModalKind::TicketForm,
        }
    }

    /// Heading shown above the modal.
    pub fn title(&self) -> &'static str {
        match self {
            ActiveModal::TicketFilter(_) => "Filter Tickets",
            ActiveModal::TicketId(_) => "Check Ticket Status",
            ActiveModal::Search(modal) => modal.kind.title(),
            ActiveModal::StockUpdate(_) => "Update Stock",
            ActiveModal::TicketForm(_) => "Create Ticket",
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        match self {
            ActiveModal::TicketFilter(modal) => modal.selected.is_some(),
            ActiveModal::TicketId(modal) => modal.can_submit(),
            ActiveModal::Search(modal) => modal.can_submit(),
            ActiveModal::StockUpdate(modal) => modal.can_submit(),
            ActiveModal::TicketForm(modal) => modal.stage == TicketFormStage::Confirm,
        }
    }

    /// Builds the slash payload this modal resolves to.
    pub fn submit(&self) -> Result<String, ModalError> {
        match self {
            ActiveModal::TicketFilter(modal) => modal.submit(),
            ActiveModal::TicketId(modal) => modal.submit(),
            ActiveModal::Search(modal) => modal.submit(),
            ActiveModal::StockUpdate(modal) => modal.submit(),
            ActiveModal::TicketForm(modal) => modal.submit(),
        }
    }
}
