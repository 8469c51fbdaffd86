//! Client for the backend's REST channel.

use async_trait::async_trait;
use helpchat_core::backend::{ConversationBackend, WebhookRequest};
use helpchat_core::config::RootConfig;
use helpchat_core::message::ReplyFragment;
use helpchat_core::{HelpchatError, Result};
use reqwest::Client;
use tracing::debug;

use crate::http::{build_client, join_url, transport_error};

pub const WEBHOOK_PATH: &str = "/webhooks/rest/webhook";

#[derive(Debug, Clone)]
pub struct RestWebhookClient {
    client: Client,
    endpoint: String,
}

impl RestWebhookClient {
    pub fn new(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            endpoint: join_url(backend_url, WEBHOOK_PATH),
        }
    }

    pub fn from_config(config: &RootConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.request_timeout_secs)?,
            &config.backend_url,
        ))
    }
}

#[async_trait]
impl ConversationBackend for RestWebhookClient {
    async fn send_message(&self, request: &WebhookRequest) -> Result<Vec<ReplyFragment>> {
        debug!("POST {} for sender {}", self.endpoint, request.sender);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HelpchatError::transport(format!(
                "backend responded with HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(transport_error)?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(Vec::new());
        }

        let fragments: Vec<ReplyFragment> = serde_json::from_str(body)?;
        debug!("Backend returned {} fragment(s)", fragments.len());
        Ok(fragments)
    }
}
