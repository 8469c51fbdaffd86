//! Interfaces of the two remote collaborators the widget talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::ReplyFragment;
use crate::theme::Theme;

/// Body of `POST /webhooks/rest/webhook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub sender: String,
    pub message: String,
    pub metadata: WebhookMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMetadata {
    pub app_id: String,
}

impl WebhookRequest {
    pub fn new(
        sender: impl Into<String>,
        message: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            metadata: WebhookMetadata {
                app_id: app_id.into(),
            },
        }
    }
}

/// The conversational backend: one message in, ordered reply fragments out.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    async fn send_message(&self, request: &WebhookRequest) -> Result<Vec<ReplyFragment>>;
}

/// Theme lookups the widget needs from the admin API.
#[async_trait]
pub trait ThemeProvider: Send + Sync {
    /// Fetches a theme by id; a missing theme is `HelpchatError::NotFound`.
    async fn theme(&self, id: i64) -> Result<Theme>;

    /// Fetches the server's default theme, if one is configured.
    async fn default_theme(&self) -> Result<Option<Theme>>;
}
