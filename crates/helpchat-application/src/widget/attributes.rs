//! The widget's configurable attributes (`title`, `app-id`, `theme-id`).

use helpchat_core::config::RootConfig;
use helpchat_core::theme::ThemeSelector;
use helpchat_core::{HelpchatError, Result};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetAttribute {
    Title,
    AppId,
    ThemeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetAttributes {
    pub title: String,
    pub app_id: String,
    pub theme: Option<ThemeSelector>,
}

impl WidgetAttributes {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            title: helpchat_core::config::DEFAULT_TITLE.to_string(),
            app_id: app_id.into(),
            theme: None,
        }
    }

    pub fn from_config(config: &RootConfig) -> Result<Self> {
        let theme = match config.theme_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse()?),
            _ => None,
        };
        Ok(Self {
            title: config.title.clone(),
            app_id: config.app_id.clone(),
            theme,
        })
    }

    /// Applies one attribute change. An empty `theme-id` clears the selector.
    pub fn apply(&mut self, attribute: WidgetAttribute, value: &str) -> Result<()> {
        match attribute {
            WidgetAttribute::Title => self.title = value.to_string(),
            WidgetAttribute::AppId => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(HelpchatError::validation("app-id must not be empty"));
                }
                self.app_id = value.to_string();
            }
            WidgetAttribute::ThemeId => {
                self.theme = match value.trim() {
                    "" => None,
                    raw => Some(raw.parse()?),
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        assert_eq!("app-id".parse::<WidgetAttribute>().unwrap(), WidgetAttribute::AppId);
        assert_eq!(WidgetAttribute::ThemeId.to_string(), "theme-id");
        assert!("color".parse::<WidgetAttribute>().is_err());
    }

    #[test]
    fn test_from_config_parses_selector() {
        let config = RootConfig {
            theme_id: Some("#112233".into()),
            ..RootConfig::default()
        };
        let attrs = WidgetAttributes::from_config(&config).unwrap();
        assert_eq!(attrs.theme, Some(ThemeSelector::Color("#112233".into())));

        let bad = RootConfig {
            theme_id: Some("ocean".into()),
            ..RootConfig::default()
        };
        assert!(WidgetAttributes::from_config(&bad).unwrap_err().is_validation());
    }

    #[test]
    fn test_apply_rejects_bad_values_without_changes() {
        let mut attrs = WidgetAttributes::new("shop");
        assert!(attrs.apply(WidgetAttribute::AppId, "  ").is_err());
        assert!(attrs.apply(WidgetAttribute::ThemeId, "blue").is_err());
        assert_eq!(attrs, WidgetAttributes::new("shop"));

        attrs.apply(WidgetAttribute::ThemeId, "4").unwrap();
        assert_eq!(attrs.theme, Some(ThemeSelector::Id(4)));
    }
}
