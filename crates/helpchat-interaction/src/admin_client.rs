//! Client for the admin REST API.
//!
//! Every endpoint except the health checks answers with an envelope
//! `{"success": bool, "<field>": ..., "error": "..."}` where the payload
//! field name differs per endpoint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use helpchat_core::admin::{
    ActionStat, AdminApi, AnalyticsSummary, ChatApp, ConversationDetail, FeedbackMetrics, Flow,
    InspectorConversation, IntentDistribution, IntentStats, RecentConversation,
    SatisfactionRatings,
};
use helpchat_core::backend::ThemeProvider;
use helpchat_core::config::RootConfig;
use helpchat_core::theme::{NewTheme, Theme, ThemeUpdate};
use helpchat_core::{HelpchatError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::http::{build_client, join_url, transport_error};

/// What a 404 refers to, so it can surface as `NotFound`.
struct Subject {
    entity_type: &'static str,
    id: String,
}

impl Subject {
    fn new(entity_type: &'static str, id: impl ToString) -> Self {
        Self {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Decoded `{success, ...}` envelope.
struct Envelope(Map<String, Value>);

impl Envelope {
    /// Takes one payload field; a missing or null field decodes from `null`.
    fn take<T: DeserializeOwned>(mut self, field: &str) -> Result<T> {
        let value = self.0.remove(field).unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone)]
pub struct AdminApiClient {
    client: Client,
    base_url: String,
}

impl AdminApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &RootConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.request_timeout_secs)?,
            config.admin_api_url.clone(),
        ))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn get(&self, path: &str, query: &[(&str, String)], subject: Subject) -> Result<Envelope> {
        self.execute(self.request(Method::GET, path).query(query), subject)
            .await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        subject: Subject,
    ) -> Result<Envelope> {
        self.execute(self.request(method, path).json(body), subject)
            .await
    }

    async fn execute(&self, builder: RequestBuilder, subject: Subject) -> Result<Envelope> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        let object = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(object)) => object,
            _ if status == StatusCode::NOT_FOUND => {
                return Err(HelpchatError::not_found(subject.entity_type, subject.id));
            }
            _ if !status.is_success() => {
                return Err(HelpchatError::transport(format!(
                    "admin API responded with HTTP {status}"
                )));
            }
            Ok(other) => {
                return Err(HelpchatError::backend(format!(
                    "unexpected admin API response: {other}"
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let success = object.get("success").and_then(Value::as_bool);
        if success == Some(true) || (success.is_none() && status.is_success()) {
            return Ok(Envelope(object));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(HelpchatError::not_found(subject.entity_type, subject.id));
        }

        let message = object
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("admin API responded with HTTP {status}"));
        warn!("Admin API call failed: {}", message);
        Err(HelpchatError::backend(message))
    }
}

fn app_filter(app_id: Option<&str>) -> Vec<(&'static str, String)> {
    app_id
        .filter(|id| !id.is_empty() && *id != "all")
        .map(|id| vec![("app_id", id.to_string())])
        .unwrap_or_default()
}

fn plain_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ThemeProvider for AdminApiClient {
    async fn theme(&self, id: i64) -> Result<Theme> {
        let envelope = self
            .get(&format!("/admin/themes/{id}"), &[], Subject::new("theme", id))
            .await?;
        envelope
            .take::<Option<Theme>>("theme")?
            .ok_or_else(|| HelpchatError::not_found("theme", id.to_string()))
    }

    async fn default_theme(&self) -> Result<Option<Theme>> {
        self.get("/admin/themes/default", &[], Subject::new("theme", "default"))
            .await?
            .take("theme")
    }
}

#[async_trait]
impl AdminApi for AdminApiClient {
    async fn list_themes(&self) -> Result<Vec<Theme>> {
        let themes: Option<Vec<Theme>> = self
            .get("/admin/themes", &[], Subject::new("themes", "all"))
            .await?
            .take("themes")?;
        Ok(themes.unwrap_or_default())
    }

    async fn create_theme(&self, theme: &NewTheme) -> Result<i64> {
        self.send_json(Method::POST, "/admin/themes", theme, Subject::new("theme", &theme.name))
            .await?
            .take("theme_id")
    }

    async fn update_theme(&self, id: i64, update: &ThemeUpdate) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/admin/themes/{id}"),
            update,
            Subject::new("theme", id),
        )
        .await?;
        Ok(())
    }

    async fn delete_theme(&self, id: i64) -> Result<()> {
        self.execute(
            self.request(Method::DELETE, &format!("/admin/themes/{id}")),
            Subject::new("theme", id),
        )
        .await?;
        Ok(())
    }

    async fn get_config(&self) -> Result<BTreeMap<String, String>> {
        let raw: Option<BTreeMap<String, Value>> = self
            .get("/admin/config", &[], Subject::new("config", "all"))
            .await?
            .take("config")?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, plain_string(value)))
            .collect())
    }

    async fn save_config(&self, values: &BTreeMap<String, String>) -> Result<()> {
        self.send_json(Method::POST, "/admin/config", values, Subject::new("config", "all"))
            .await?;
        Ok(())
    }

    async fn get_config_value(&self, key: &str) -> Result<String> {
        let value: Value = self
            .get(&format!("/admin/config/{key}"), &[], Subject::new("config key", key))
            .await?
            .take("value")?;
        Ok(plain_string(value))
    }

    async fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        self.send_json(
            Method::POST,
            &format!("/admin/config/{key}"),
            &json!({ "value": value }),
            Subject::new("config key", key),
        )
        .await?;
        Ok(())
    }

    async fn analytics_apps(&self) -> Result<Vec<ChatApp>> {
        let apps: Option<Vec<ChatApp>> = self
            .get("/admin/analytics/apps", &[], Subject::new("apps", "all"))
            .await?
            .take("apps")?;
        Ok(apps.unwrap_or_default())
    }

    async fn analytics_summary(&self, app_id: Option<&str>) -> Result<AnalyticsSummary> {
        self.get(
            "/admin/analytics/summary",
            &app_filter(app_id),
            Subject::new("analytics", "summary"),
        )
        .await?
        .take("data")
    }

    async fn analytics_intents(&self, app_id: Option<&str>) -> Result<IntentDistribution> {
        self.get(
            "/admin/analytics/intents",
            &app_filter(app_id),
            Subject::new("analytics", "intents"),
        )
        .await?
        .take("data")
    }

    async fn analytics_feedback(&self, app_id: Option<&str>) -> Result<FeedbackMetrics> {
        self.get(
            "/admin/analytics/feedback",
            &app_filter(app_id),
            Subject::new("analytics", "feedback"),
        )
        .await?
        .take("data")
    }

    async fn analytics_conversations(
        &self,
        app_id: Option<&str>,
    ) -> Result<Vec<RecentConversation>> {
        let conversations: Option<Vec<RecentConversation>> = self
            .get(
                "/admin/analytics/conversations",
                &app_filter(app_id),
                Subject::new("analytics", "conversations"),
            )
            .await?
            .take("data")?;
        Ok(conversations.unwrap_or_default())
    }

    async fn analytics_satisfaction(&self, days: Option<u32>) -> Result<SatisfactionRatings> {
        let days = days.map_or_else(|| "all".to_string(), |d| d.to_string());
        self.get(
            "/admin/analytics/satisfaction",
            &[("days", days)],
            Subject::new("analytics", "satisfaction"),
        )
        .await?
        .take("data")
    }

    async fn inspector_conversations(
        &self,
        limit: u32,
        app_id: Option<&str>,
    ) -> Result<Vec<InspectorConversation>> {
        let mut query = vec![("limit", limit.to_string())];
        query.extend(app_filter(app_id));
        let conversations: Option<Vec<InspectorConversation>> = self
            .get(
                "/inspector/conversations",
                &query,
                Subject::new("conversations", "all"),
            )
            .await?
            .take("data")?;
        Ok(conversations.unwrap_or_default())
    }

    async fn inspector_conversation(&self, sender_id: &str) -> Result<ConversationDetail> {
        self.get(
            &format!("/inspector/conversation/{sender_id}"),
            &[],
            Subject::new("conversation", sender_id),
        )
        .await?
        .take("data")
    }

    async fn inspector_flows(&self) -> Result<Vec<Flow>> {
        let flows: Option<Vec<Flow>> = self
            .get("/inspector/flows", &[], Subject::new("flows", "all"))
            .await?
            .take("data")?;
        Ok(flows.unwrap_or_default())
    }

    async fn inspector_intents(&self) -> Result<IntentStats> {
        self.get("/inspector/intents", &[], Subject::new("intents", "all"))
            .await?
            .take("data")
    }

    async fn inspector_actions(&self) -> Result<Vec<ActionStat>> {
        let actions: Option<Vec<ActionStat>> = self
            .get("/inspector/actions", &[], Subject::new("actions", "all"))
            .await?
            .take("data")?;
        Ok(actions.unwrap_or_default())
    }

    async fn inspector_domain(&self) -> Result<Value> {
        self.get("/inspector/domain", &[], Subject::new("domain", "all"))
            .await?
            .take("data")
    }

    async fn health(&self) -> Result<Value> {
        let envelope = self
            .get("/inspector/health", &[], Subject::new("health", "inspector"))
            .await?;
        Ok(Value::Object(envelope.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_means_no_filter() {
        assert!(app_filter(None).is_empty());
        assert!(app_filter(Some("all")).is_empty());
        assert_eq!(app_filter(Some("shop")), vec![("app_id", "shop".to_string())]);
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(plain_string(json!("x")), "x");
        assert_eq!(plain_string(json!(5005)), "5005");
        assert_eq!(plain_string(Value::Null), "");
    }
}
