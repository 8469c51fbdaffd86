use std::sync::Arc;

use helpchat_core::Result;
use helpchat_core::admin::{
    ActionStat, AdminApi, ConversationDetail, Flow, InspectorConversation, IntentStats,
};
use serde_json::Value;

pub const DEFAULT_CONVERSATION_LIMIT: u32 = 100;

/// Conversation inspector screen.
pub struct InspectorController {
    api: Arc<dyn AdminApi>,
    conversations: Vec<InspectorConversation>,
    selected: Option<ConversationDetail>,
    flows: Vec<Flow>,
    intents: Option<IntentStats>,
    actions: Vec<ActionStat>,
    domain: Option<Value>,
}

impl InspectorController {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            conversations: Vec::new(),
            selected: None,
            flows: Vec::new(),
            intents: None,
            actions: Vec::new(),
            domain: None,
        }
    }

    pub async fn conversations(
        &mut self,
        limit: u32,
        app_id: Option<&str>,
    ) -> Result<&[InspectorConversation]> {
        self.conversations = self.api.inspector_conversations(limit, app_id).await?;
        Ok(&self.conversations)
    }

    pub async fn conversation(&mut self, sender_id: &str) -> Result<&ConversationDetail> {
        let detail = self.api.inspector_conversation(sender_id).await?;
        Ok(self.selected.insert(detail))
    }

    pub fn selected(&self) -> Option<&ConversationDetail> {
        self.selected.as_ref()
    }

    pub async fn flows(&mut self) -> Result<&[Flow]> {
        self.flows = self.api.inspector_flows().await?;
        Ok(&self.flows)
    }

    pub async fn intents(&mut self) -> Result<&IntentStats> {
        let intents = self.api.inspector_intents().await?;
        Ok(self.intents.insert(intents))
    }

    pub async fn actions(&mut self) -> Result<&[ActionStat]> {
        self.actions = self.api.inspector_actions().await?;
        Ok(&self.actions)
    }

    pub async fn domain(&mut self) -> Result<&Value> {
        let domain = self.api.inspector_domain().await?;
        Ok(self.domain.insert(domain))
    }

    pub async fn health(&self) -> Result<Value> {
        self.api.health().await
    }
}
