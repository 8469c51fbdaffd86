//! Chat message model.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Sender literal used for every bot-originated message.
pub const BOT_SENDER: &str = "bot";

/// Who authored a message.
///
/// Serialized as the literal `"bot"` or the conversation's sender id, which
/// keeps persisted history readable and stable across releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    Bot,
    User(String),
}

impl Sender {
    pub fn is_bot(&self) -> bool {
        matches!(self, Sender::Bot)
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        if value == BOT_SENDER {
            Sender::Bot
        } else {
            Sender::User(value)
        }
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        match value {
            Sender::Bot => BOT_SENDER.to_string(),
            Sender::User(id) => id,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Bot => f.write_str(BOT_SENDER),
            Sender::User(id) => f.write_str(id),
        }
    }
}

/// A quick-reply button. Clicking it sends `payload` and shows `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
        }
    }
}

/// A downloadable invoice attached to a bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub order_id: String,
    pub filename: String,
    /// Base64-encoded PDF bytes, when the backend inlined them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_data: Option<String>,
}

/// A single renderable chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_form: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
    pub created_at: String,
}

impl Message {
    fn with_sender(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            buttons: Vec::new(),
            chart: None,
            video: None,
            ticket_form: None,
            invoice: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Creates a bot-authored message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::with_sender(Sender::Bot, text)
    }

    /// Creates a user-authored message for the given sender id.
    pub fn user(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_sender(Sender::User(sender_id.into()), text)
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    /// True when the message carries nothing renderable.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.buttons.is_empty()
            && self.chart.is_none()
            && self.video.is_none()
            && self.ticket_form.is_none()
            && self.invoice.is_none()
    }
}
