//! The chat widget use case.

mod attributes;
mod chat_widget;
mod loading;

pub use attributes::{WidgetAttribute, WidgetAttributes};
pub use chat_widget::{CONNECTION_ERROR_TEXT, ChatWidget, DispatchOutcome};
