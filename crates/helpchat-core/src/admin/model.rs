//! Data shapes returned by the admin REST API.
//!
//! Fields default liberally: the API is backed by ad hoc SQL and omits or
//! nulls columns freely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::serde_util::{bool_from_any, string_from_any};

/// A registered chat application (the `app-id` a widget runs under).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatApp {
    pub id: i64,
    pub app_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "bool_from_any")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSummary {
    pub total_conversations: u64,
    pub total_messages: u64,
    pub feedback_positive: u64,
    pub feedback_negative: u64,
    pub resolution_rate: f64,
    pub top_intents: Vec<(String, u64)>,
    pub conversations_today: u64,
    pub intent_distribution: BTreeMap<String, u64>,
    pub app_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentDistribution {
    pub intents: BTreeMap<String, u64>,
    pub top_intents: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackMetrics {
    pub positive: u64,
    pub negative: u64,
    pub resolution_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentConversation {
    pub sender_id: String,
    pub app_id: String,
    pub started_at: Option<String>,
    pub message_count: u64,
    pub intents: Value,
    pub feedback: Option<String>,
    #[serde(deserialize_with = "bool_from_any")]
    pub resolved: bool,
}

/// Star-rating distribution; keys are `"1"` to `"5"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatisfactionRatings {
    pub ratings: BTreeMap<String, u64>,
    pub total: u64,
    pub average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConversation {
    pub id: i64,
    pub sender_id: String,
    pub sender_id_short: String,
    pub app_id: String,
    #[serde(deserialize_with = "string_from_any")]
    pub user_id: String,
    pub started_at: Option<String>,
    pub last_activity: Option<String>,
    #[serde(deserialize_with = "bool_from_any")]
    pub resolved: bool,
    pub message_count: u64,
    pub user_message_count: u64,
    pub action_count: u64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationInfo {
    pub id: i64,
    pub sender_id: String,
    #[serde(deserialize_with = "string_from_any")]
    pub app_id: String,
    #[serde(deserialize_with = "string_from_any")]
    pub user_id: String,
    pub started_at: Option<String>,
    pub last_activity: Option<String>,
    #[serde(deserialize_with = "bool_from_any")]
    pub resolved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptMessage {
    pub id: i64,
    pub sender: String,
    #[serde(deserialize_with = "string_from_any")]
    pub text: String,
    pub intent: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentEvent {
    pub intent: String,
    #[serde(deserialize_with = "string_from_any")]
    pub message: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionEvent {
    pub action: String,
    #[serde(deserialize_with = "bool_from_any")]
    pub success: bool,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationStats {
    pub total_messages: u64,
    pub user_messages: u64,
    pub bot_messages: u64,
    pub actions_executed: u64,
    pub unique_intents: u64,
}

/// Full transcript of one conversation as the inspector shows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationDetail {
    pub conversation: ConversationInfo,
    pub messages: Vec<TranscriptMessage>,
    pub intent_history: Vec<IntentEvent>,
    pub actions: Vec<ActionEvent>,
    pub feedback: Vec<FeedbackEvent>,
    pub stats: ConversationStats,
}

/// A story or rule defined in the backend's training data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub steps: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentStats {
    pub distribution: BTreeMap<String, u64>,
    pub hourly_activity: BTreeMap<String, u64>,
    pub known_intents: Vec<String>,
    pub total_intent_messages: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionStat {
    pub action: String,
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub success_rate: f64,
}
