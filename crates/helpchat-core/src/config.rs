//! Root configuration shared by the chat client and the admin console.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5005";
pub const DEFAULT_ADMIN_API_URL: &str = "http://localhost:8181";
pub const DEFAULT_APP_ID: &str = "default";
pub const DEFAULT_TITLE: &str = "Support";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration stored in `config.toml`.
///
/// Every field has a default so a partially written file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Base URL of the conversational backend (the webhook server).
    pub backend_url: String,
    /// Base URL of the admin REST API.
    pub admin_api_url: String,
    /// Application id the widget runs under; scopes all persisted state.
    pub app_id: String,
    /// Title shown in the chat header.
    pub title: String,
    /// Theme selector: a numeric theme id or a literal `#rrggbb` color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    /// Per-request timeout for HTTP calls.
    pub request_timeout_secs: u64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            admin_api_url: DEFAULT_ADMIN_API_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            theme_id: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
