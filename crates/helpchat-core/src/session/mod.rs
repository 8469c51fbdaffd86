//! Conversation sessions and widget persistence.

pub mod model;
pub mod repository;

pub use model::{ConversationSession, FeedbackVote, WELCOME_TEXT, WidgetState, welcome_message};
pub use repository::WidgetStore;
