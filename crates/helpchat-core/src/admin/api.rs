//! Admin REST API trait consumed by the console controllers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use super::model::{
    ActionStat, AnalyticsSummary, ChatApp, ConversationDetail, FeedbackMetrics, Flow,
    InspectorConversation, IntentDistribution, IntentStats, RecentConversation,
    SatisfactionRatings,
};
use crate::backend::ThemeProvider;
use crate::error::Result;
use crate::theme::{NewTheme, Theme, ThemeUpdate};

/// Every admin API call the console makes.
///
/// `app_id` filters are optional; `None` means all applications.
#[async_trait]
pub trait AdminApi: ThemeProvider {
    // Themes
    async fn list_themes(&self) -> Result<Vec<Theme>>;
    /// Creates a theme and returns its id.
    async fn create_theme(&self, theme: &NewTheme) -> Result<i64>;
    async fn update_theme(&self, id: i64, update: &ThemeUpdate) -> Result<()>;
    async fn delete_theme(&self, id: i64) -> Result<()>;

    // Configuration
    async fn get_config(&self) -> Result<BTreeMap<String, String>>;
    async fn save_config(&self, values: &BTreeMap<String, String>) -> Result<()>;
    async fn get_config_value(&self, key: &str) -> Result<String>;
    async fn set_config_value(&self, key: &str, value: &str) -> Result<()>;

    // Analytics
    async fn analytics_apps(&self) -> Result<Vec<ChatApp>>;
    async fn analytics_summary(&self, app_id: Option<&str>) -> Result<AnalyticsSummary>;
    async fn analytics_intents(&self, app_id: Option<&str>) -> Result<IntentDistribution>;
    async fn analytics_feedback(&self, app_id: Option<&str>) -> Result<FeedbackMetrics>;
    async fn analytics_conversations(&self, app_id: Option<&str>)
    -> Result<Vec<RecentConversation>>;
    /// `days: None` covers the full history.
    async fn analytics_satisfaction(&self, days: Option<u32>) -> Result<SatisfactionRatings>;

    // Inspector
    async fn inspector_conversations(
        &self,
        limit: u32,
        app_id: Option<&str>,
    ) -> Result<Vec<InspectorConversation>>;
    async fn inspector_conversation(&self, sender_id: &str) -> Result<ConversationDetail>;
    async fn inspector_flows(&self) -> Result<Vec<Flow>>;
    async fn inspector_intents(&self) -> Result<IntentStats>;
    async fn inspector_actions(&self) -> Result<Vec<ActionStat>>;
    async fn inspector_domain(&self) -> Result<Value>;
    async fn health(&self) -> Result<Value>;
}
