//! Volatile widget store for tests and `--no-persist` sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use helpchat_core::Result;
use helpchat_core::session::{WidgetState, WidgetStore};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemoryWidgetStore {
    states: Arc<RwLock<HashMap<String, WidgetState>>>,
}

impl InMemoryWidgetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WidgetStore for InMemoryWidgetStore {
    async fn load(&self, app_id: &str) -> Result<Option<WidgetState>> {
        Ok(self.states.read().await.get(app_id).cloned())
    }

    async fn save(&self, app_id: &str, state: &WidgetState) -> Result<()> {
        self.states
            .write()
            .await
            .insert(app_id.to_string(), state.clone());
        Ok(())
    }

    async fn delete(&self, app_id: &str) -> Result<()> {
        self.states.write().await.remove(app_id);
        Ok(())
    }
}
