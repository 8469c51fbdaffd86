use std::sync::Arc;

use helpchat_core::Result;
use helpchat_core::admin::{
    AdminApi, AnalyticsSummary, ChatApp, FeedbackMetrics, IntentDistribution, RecentConversation,
    SatisfactionRatings,
};

/// Analytics dashboard, optionally filtered to one app.
pub struct AnalyticsController {
    api: Arc<dyn AdminApi>,
    app_filter: Option<String>,
    apps: Vec<ChatApp>,
    summary: Option<AnalyticsSummary>,
    intents: Option<IntentDistribution>,
    feedback: Option<FeedbackMetrics>,
    conversations: Vec<RecentConversation>,
    satisfaction: Option<SatisfactionRatings>,
}

impl AnalyticsController {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            app_filter: None,
            apps: Vec::new(),
            summary: None,
            intents: None,
            feedback: None,
            conversations: Vec::new(),
            satisfaction: None,
        }
    }

    pub fn app_filter(&self) -> Option<&str> {
        self.app_filter.as_deref()
    }

    /// Sets the app filter; `all` or blank removes it.
    pub fn set_app_filter(&mut self, app_id: Option<&str>) {
        self.app_filter = app_id
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "all")
            .map(str::to_string);
    }

    pub async fn apps(&mut self) -> Result<&[ChatApp]> {
        self.apps = self.api.analytics_apps().await?;
        Ok(&self.apps)
    }

    pub async fn summary(&mut self) -> Result<&AnalyticsSummary> {
        let summary = self.api.analytics_summary(self.app_filter.as_deref()).await?;
        Ok(self.summary.insert(summary))
    }

    pub async fn intents(&mut self) -> Result<&IntentDistribution> {
        let intents = self.api.analytics_intents(self.app_filter.as_deref()).await?;
        Ok(self.intents.insert(intents))
    }

    pub async fn feedback(&mut self) -> Result<&FeedbackMetrics> {
        let feedback = self.api.analytics_feedback(self.app_filter.as_deref()).await?;
        Ok(self.feedback.insert(feedback))
    }

    pub async fn conversations(&mut self) -> Result<&[RecentConversation]> {
        self.conversations = self
            .api
            .analytics_conversations(self.app_filter.as_deref())
            .await?;
        Ok(&self.conversations)
    }

    /// Rating distribution over the last `days` days, or all time.
    pub async fn satisfaction(&mut self, days: Option<u32>) -> Result<&SatisfactionRatings> {
        let ratings = self.api.analytics_satisfaction(days).await?;
        Ok(self.satisfaction.insert(ratings))
    }

    pub fn last_summary(&self) -> Option<&AnalyticsSummary> {
        self.summary.as_ref()
    }
}
