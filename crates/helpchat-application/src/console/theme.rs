use std::sync::Arc;

use helpchat_core::Result;
use helpchat_core::admin::AdminApi;
use helpchat_core::theme::{NewTheme, Theme, ThemeSettings, ThemeUpdate};
use tracing::warn;

use super::Toast;

/// Theme management screen.
pub struct ThemeController {
    api: Arc<dyn AdminApi>,
    themes: Vec<Theme>,
}

impl ThemeController {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            themes: Vec::new(),
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn find(&self, id: i64) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.id == Some(id))
    }

    /// Reloads the theme list.
    pub async fn load(&mut self) -> Result<&[Theme]> {
        self.themes = self.api.list_themes().await?;
        Ok(&self.themes)
    }

    pub async fn create(&mut self, name: &str, settings: ThemeSettings, is_default: bool) -> Toast {
        let theme = NewTheme {
            name: name.to_string(),
            settings,
            is_default,
        };
        match self.api.create_theme(&theme).await {
            Ok(id) => self.after_mutation(format!("Theme \"{}\" created (id {}).", name, id)).await,
            Err(err) => Toast::from(&err),
        }
    }

    pub async fn update(&mut self, id: i64, patch: ThemeUpdate) -> Toast {
        match self.api.update_theme(id, &patch).await {
            Ok(()) => self.after_mutation(format!("Theme {} updated.", id)).await,
            Err(err) => Toast::from(&err),
        }
    }

    pub async fn delete(&mut self, id: i64) -> Toast {
        match self.api.delete_theme(id).await {
            Ok(()) => self.after_mutation(format!("Theme {} deleted.", id)).await,
            Err(err) => Toast::from(&err),
        }
    }

    pub async fn set_default(&mut self, id: i64) -> Toast {
        let patch = ThemeUpdate {
            is_default: Some(true),
            ..ThemeUpdate::default()
        };
        match self.api.update_theme(id, &patch).await {
            Ok(()) => self.after_mutation(format!("Theme {} is now the default.", id)).await,
            Err(err) => Toast::from(&err),
        }
    }

    async fn after_mutation(&mut self, message: String) -> Toast {
        if let Err(err) = self.load().await {
            warn!("Theme list reload failed: {}", err);
        }
        Toast::success(message)
    }
}
