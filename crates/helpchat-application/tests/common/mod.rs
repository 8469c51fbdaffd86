#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpchat_application::{ChatWidget, WidgetAttributes};
use helpchat_core::admin::*;
use helpchat_core::backend::{ConversationBackend, ThemeProvider, WebhookRequest};
use helpchat_core::message::ReplyFragment;
use helpchat_core::theme::{NewTheme, Theme, ThemeSettings, ThemeUpdate};
use helpchat_core::{HelpchatError, Result};
use helpchat_infrastructure::InMemoryWidgetStore;
use serde_json::{Value, json};

/// Backend that replays queued replies and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Vec<ReplyFragment>>>>,
    pub requests: Mutex<Vec<WebhookRequest>>,
    loading: Mutex<Option<Arc<AtomicBool>>>,
    /// Value of the watched loading flag seen by each request.
    pub loading_seen: Mutex<Vec<bool>>,
}

impl ScriptedBackend {
    pub fn reply(&self, fragments: Value) {
        let fragments = serde_json::from_value(fragments).unwrap();
        self.replies.lock().unwrap().push_back(Ok(fragments));
    }

    pub fn fail(&self) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(HelpchatError::transport("connection refused")));
    }

    pub fn watch_loading(&self, flag: Arc<AtomicBool>) {
        *self.loading.lock().unwrap() = Some(flag);
    }

    pub fn sent(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

#[async_trait]
impl ConversationBackend for ScriptedBackend {
    async fn send_message(&self, request: &WebhookRequest) -> Result<Vec<ReplyFragment>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(flag) = self.loading.lock().unwrap().as_ref() {
            self.loading_seen
                .lock()
                .unwrap()
                .push(flag.load(Ordering::SeqCst));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// In-memory admin API holding themes and config.
#[derive(Default)]
pub struct FakeAdmin {
    pub themes: Mutex<BTreeMap<i64, Theme>>,
    pub config: Mutex<BTreeMap<String, String>>,
    pub offline: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAdmin {
    pub fn with_theme(self, id: i64, name: &str, primary: &str) -> Self {
        let theme = Theme {
            id: Some(id),
            name: name.to_string(),
            settings: ThemeSettings {
                primary_color: primary.to_string(),
                ..ThemeSettings::default()
            },
            is_default: false,
        };
        self.themes.lock().unwrap().insert(id, theme);
        self
    }

    pub fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    fn check(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if *self.offline.lock().unwrap() {
            Err(HelpchatError::transport("admin API unreachable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ThemeProvider for FakeAdmin {
    async fn theme(&self, id: i64) -> Result<Theme> {
        self.check("theme")?;
        self.themes
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| HelpchatError::not_found("theme", id.to_string()))
    }

    async fn default_theme(&self) -> Result<Option<Theme>> {
        self.check("default_theme")?;
        Ok(self
            .themes
            .lock()
            .unwrap()
            .values()
            .find(|t| t.is_default)
            .cloned())
    }
}

#[async_trait]
impl AdminApi for FakeAdmin {
    async fn list_themes(&self) -> Result<Vec<Theme>> {
        self.check("list_themes")?;
        Ok(self.themes.lock().unwrap().values().cloned().collect())
    }

    async fn create_theme(&self, theme: &NewTheme) -> Result<i64> {
        self.check("create_theme")?;
        let mut themes = self.themes.lock().unwrap();
        let id = themes.keys().max().copied().unwrap_or(0) + 1;
        themes.insert(
            id,
            Theme {
                id: Some(id),
                name: theme.name.clone(),
                settings: theme.settings.clone(),
                is_default: theme.is_default,
            },
        );
        Ok(id)
    }

    async fn update_theme(&self, id: i64, update: &ThemeUpdate) -> Result<()> {
        self.check("update_theme")?;
        let mut themes = self.themes.lock().unwrap();
        if !themes.contains_key(&id) {
            return Err(HelpchatError::not_found("theme", id.to_string()));
        }
        if update.is_default == Some(true) {
            for theme in themes.values_mut() {
                theme.is_default = false;
            }
        }
        let theme = themes.get_mut(&id).unwrap();
        if let Some(name) = &update.name {
            theme.name = name.clone();
        }
        if let Some(settings) = &update.settings {
            theme.settings = settings.clone();
        }
        if let Some(is_default) = update.is_default {
            theme.is_default = is_default;
        }
        Ok(())
    }

    async fn delete_theme(&self, id: i64) -> Result<()> {
        self.check("delete_theme")?;
        self.themes.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn get_config(&self) -> Result<BTreeMap<String, String>> {
        self.check("get_config")?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn save_config(&self, values: &BTreeMap<String, String>) -> Result<()> {
        self.check("save_config")?;
        self.config.lock().unwrap().extend(values.clone());
        Ok(())
    }

    async fn get_config_value(&self, key: &str) -> Result<String> {
        self.check("get_config_value")?;
        Ok(self.config.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    async fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        self.check("set_config_value")?;
        self.config
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn analytics_apps(&self) -> Result<Vec<ChatApp>> {
        self.check("analytics_apps")?;
        Ok(vec![ChatApp {
            app_id: "shop".into(),
            name: "Shop".into(),
            ..Default::default()
        }])
    }

    async fn analytics_summary(&self, app_id: Option<&str>) -> Result<AnalyticsSummary> {
        self.check(&format!("analytics_summary:{}", app_id.unwrap_or("*")))?;
        Ok(AnalyticsSummary {
            total_conversations: 7,
            app_id: app_id.unwrap_or("all").to_string(),
            ..Default::default()
        })
    }

    async fn analytics_intents(&self, app_id: Option<&str>) -> Result<IntentDistribution> {
        self.check(&format!("analytics_intents:{}", app_id.unwrap_or("*")))?;
        Ok(IntentDistribution::default())
    }

    async fn analytics_feedback(&self, app_id: Option<&str>) -> Result<FeedbackMetrics> {
        self.check(&format!("analytics_feedback:{}", app_id.unwrap_or("*")))?;
        Ok(FeedbackMetrics {
            positive: 3,
            negative: 1,
            resolution_rate: 75.0,
        })
    }

    async fn analytics_conversations(
        &self,
        app_id: Option<&str>,
    ) -> Result<Vec<RecentConversation>> {
        self.check(&format!("analytics_conversations:{}", app_id.unwrap_or("*")))?;
        Ok(Vec::new())
    }

    async fn analytics_satisfaction(&self, days: Option<u32>) -> Result<SatisfactionRatings> {
        self.check(&format!("analytics_satisfaction:{:?}", days))?;
        Ok(SatisfactionRatings::default())
    }

    async fn inspector_conversations(
        &self,
        limit: u32,
        _app_id: Option<&str>,
    ) -> Result<Vec<InspectorConversation>> {
        self.check("inspector_conversations")?;
        Ok((0..limit.min(2))
            .map(|i| InspectorConversation {
                id: i as i64,
                sender_id: format!("sender-{i}"),
                ..Default::default()
            })
            .collect())
    }

    async fn inspector_conversation(&self, sender_id: &str) -> Result<ConversationDetail> {
        self.check("inspector_conversation")?;
        if sender_id == "missing" {
            return Err(HelpchatError::not_found("conversation", sender_id));
        }
        let mut detail = ConversationDetail::default();
        detail.conversation.sender_id = sender_id.to_string();
        Ok(detail)
    }

    async fn inspector_flows(&self) -> Result<Vec<Flow>> {
        self.check("inspector_flows")?;
        Ok(Vec::new())
    }

    async fn inspector_intents(&self) -> Result<IntentStats> {
        self.check("inspector_intents")?;
        Ok(IntentStats::default())
    }

    async fn inspector_actions(&self) -> Result<Vec<ActionStat>> {
        self.check("inspector_actions")?;
        Ok(Vec::new())
    }

    async fn inspector_domain(&self) -> Result<Value> {
        self.check("inspector_domain")?;
        Ok(json!({"intents": ["greet"]}))
    }

    async fn health(&self) -> Result<Value> {
        self.check("health")?;
        Ok(json!({"status": "healthy"}))
    }
}

pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub admin: Arc<FakeAdmin>,
    pub store: Arc<InMemoryWidgetStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(ScriptedBackend::default()),
            admin: Arc::new(FakeAdmin::default().with_theme(6, "Modern Dark", "#6366F1")),
            store: Arc::new(InMemoryWidgetStore::new()),
        }
    }

    pub async fn mount(&self, attributes: WidgetAttributes) -> ChatWidget {
        ChatWidget::mount(
            self.backend.clone(),
            self.admin.clone(),
            self.store.clone(),
            attributes,
        )
        .await
        .unwrap()
    }

    pub async fn widget(&self) -> ChatWidget {
        self.mount(WidgetAttributes::new("shop")).await
    }
}
