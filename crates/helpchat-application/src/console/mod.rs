//! Admin console controllers.
//!
//! Each controller owns the state of one console screen. A failed fetch
//! leaves that state untouched; mutations report their result as a [`Toast`].

mod analytics;
mod config;
mod inspector;
mod theme;

use std::fmt;

use helpchat_core::HelpchatError;

pub use analytics::AnalyticsController;
pub use config::{ConfigController, KNOWN_CONFIG_KEYS, MASK, is_secret_key};
pub use inspector::{DEFAULT_CONVERSATION_LIMIT, InspectorController};
pub use theme::ThemeController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Short notification shown after a console action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == ToastKind::Success
    }
}

impl From<&HelpchatError> for Toast {
    fn from(err: &HelpchatError) -> Self {
        Toast::error(err.to_string())
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ToastKind::Success => write!(f, "✓ {}", self.text),
            ToastKind::Error => write!(f, "✗ {}", self.text),
        }
    }
}
