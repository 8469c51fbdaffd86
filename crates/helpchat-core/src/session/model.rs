//! Per-`app-id` conversation state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::message::{Button, Message, ProfileUpdate};

pub const WELCOME_TEXT: &str = "👋 Hi! I'm your support assistant. How can I help you today?";

/// First message of every fresh conversation.
pub fn welcome_message() -> Message {
    Message::bot(WELCOME_TEXT).with_buttons(vec![
        Button::new("🔍 Search Products", "/search_products"),
        Button::new("🛒 Track Order", "/track_order"),
        Button::new("📦 Check Stock", "/check_stock"),
        Button::new("❓ Help", "/help"),
    ])
}

/// Identity of one widget conversation with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub sender_id: String,
    pub app_id: String,
}

impl ConversationSession {
    /// Starts a session with a freshly generated sender id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            sender_id: Uuid::new_v4().to_string(),
            app_id: app_id.into(),
        }
    }
}

/// A thumbs up or down on a bot message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackVote {
    Up,
    Down,
}

/// Everything the widget persists for one `app-id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub privacy_dismissed: bool,
    #[serde(default)]
    pub feedback: BTreeMap<String, FeedbackVote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = ConversationSession::new("shop");
        let b = ConversationSession::new("shop");
        assert_ne!(a.sender_id, b.sender_id);
        assert!(Uuid::parse_str(&a.sender_id).is_ok());
    }

    #[test]
    fn test_vote_parsing() {
        assert_eq!("UP".parse::<FeedbackVote>().unwrap(), FeedbackVote::Up);
        assert_eq!(FeedbackVote::Down.to_string(), "down");
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let mut state = WidgetState {
            sender_id: Some("abc".into()),
            messages: vec![welcome_message()],
            ..Default::default()
        };
        state.feedback.insert("m1".into(), FeedbackVote::Up);

        let json = serde_json::to_string(&state).unwrap();
        let back: WidgetState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
