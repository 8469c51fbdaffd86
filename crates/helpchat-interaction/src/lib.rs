//! HTTP clients for the conversational backend and the admin API.

pub mod admin_client;
mod http;
pub mod webhook_client;

pub use admin_client::AdminApiClient;
pub use http::build_client;
pub use webhook_client::RestWebhookClient;
