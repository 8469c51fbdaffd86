//! Wiring of the widget and the console from configuration.

use std::sync::Arc;

use helpchat_core::Result;
use helpchat_core::config::RootConfig;
use helpchat_core::session::WidgetStore;
use helpchat_infrastructure::{FileWidgetStore, HelpchatPaths, InMemoryWidgetStore};
use helpchat_interaction::{AdminApiClient, RestWebhookClient, build_client};
use tracing::debug;

use crate::widget::{ChatWidget, WidgetAttributes};

/// Builds widgets and admin clients that share one HTTP client.
pub struct WidgetFactory {
    config: RootConfig,
    paths: HelpchatPaths,
    persist: bool,
}

impl WidgetFactory {
    pub fn new(config: RootConfig, paths: HelpchatPaths) -> Self {
        Self {
            config,
            paths,
            persist: true,
        }
    }

    /// Keeps widget state in memory only.
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    pub fn admin_api(&self) -> Result<Arc<AdminApiClient>> {
        Ok(Arc::new(AdminApiClient::from_config(&self.config)?))
    }

    pub fn widget_store(&self) -> Result<Arc<dyn WidgetStore>> {
        if self.persist {
            Ok(Arc::new(FileWidgetStore::from_paths(&self.paths)?))
        } else {
            Ok(Arc::new(InMemoryWidgetStore::new()))
        }
    }

    /// Mounts a widget configured by `RootConfig`.
    pub async fn mount_widget(&self) -> Result<ChatWidget> {
        let client = build_client(self.config.request_timeout_secs)?;
        let backend = Arc::new(RestWebhookClient::new(client.clone(), &self.config.backend_url));
        let themes = Arc::new(AdminApiClient::new(
            client,
            self.config.admin_api_url.clone(),
        ));
        debug!(
            "Mounting widget: backend={} admin={} persist={}",
            self.config.backend_url, self.config.admin_api_url, self.persist
        );

        ChatWidget::mount(
            backend,
            themes,
            self.widget_store()?,
            WidgetAttributes::from_config(&self.config)?,
        )
        .await
    }
}
