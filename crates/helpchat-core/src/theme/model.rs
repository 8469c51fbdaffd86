//! Theme model as served by the admin API.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HelpchatError, Result};
use crate::serde_util::{bool_from_any, string_from_any};

/// A named widget theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "settings_from_any")]
    pub settings: ThemeSettings,
    #[serde(default, deserialize_with = "bool_from_any")]
    pub is_default: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            id: None,
            name: "Default".to_string(),
            settings: ThemeSettings::default(),
            is_default: false,
        }
    }
}

impl Theme {
    /// Default look with the primary color replaced (legacy `theme-id="#rrggbb"`).
    pub fn from_color(color: &str) -> Self {
        Self {
            name: "Custom".to_string(),
            settings: ThemeSettings {
                primary_color: color.to_string(),
                ..ThemeSettings::default()
            },
            ..Self::default()
        }
    }
}

/// Every visual knob of the widget.
///
/// Themes seeded on the server often carry only a handful of keys, so each
/// missing key falls back to the widget default. Sizes arrive as numbers or
/// strings and are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    #[serde(deserialize_with = "string_from_any")]
    pub primary_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub secondary_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub bg_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub text_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub font_family: String,
    #[serde(deserialize_with = "string_from_any")]
    pub border_radius: String,
    #[serde(deserialize_with = "string_from_any")]
    pub bot_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub bot_icon_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub user_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub user_icon_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub send_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub send_icon_color: String,
    #[serde(deserialize_with = "string_from_any")]
    pub attach_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub delete_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub collapse_icon: String,
    #[serde(deserialize_with = "string_from_any")]
    pub header_font_size: String,
    #[serde(deserialize_with = "string_from_any")]
    pub message_font_size: String,
    #[serde(deserialize_with = "string_from_any")]
    pub button_font_size: String,
    #[serde(deserialize_with = "string_from_any")]
    pub input_font_size: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#0077B6".to_string(),
            secondary_color: "#00B4D8".to_string(),
            bg_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            font_family: "Inter".to_string(),
            border_radius: "12".to_string(),
            bot_icon: "🤖".to_string(),
            bot_icon_color: "#ffffff".to_string(),
            user_icon: "👤".to_string(),
            user_icon_color: "#ffffff".to_string(),
            send_icon: "➤".to_string(),
            send_icon_color: "#ffffff".to_string(),
            attach_icon: "📎".to_string(),
            delete_icon: "🗑".to_string(),
            collapse_icon: "—".to_string(),
            header_font_size: "16".to_string(),
            message_font_size: "14".to_string(),
            button_font_size: "13".to_string(),
            input_font_size: "14".to_string(),
        }
    }
}

impl ThemeSettings {
    /// Sets one setting by its wire name (`primaryColor`, `headerFontSize`, ...).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut object = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => return Err(HelpchatError::internal("theme settings are not an object")),
        };
        if !object.contains_key(key) {
            return Err(HelpchatError::validation(format!(
                "unknown theme setting '{}'",
                key
            )));
        }
        object.insert(key.to_string(), Value::String(value.to_string()));
        *self = serde_json::from_value(Value::Object(object))?;
        Ok(())
    }

    /// Wire names of every setting, sorted.
    pub fn keys() -> Vec<String> {
        match serde_json::to_value(ThemeSettings::default()) {
            Ok(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Payload of `POST /admin/themes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTheme {
    pub name: String,
    pub settings: ThemeSettings,
    pub is_default: bool,
}

/// Payload of `PUT /admin/themes/<id>`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ThemeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Settings are stored as a JSON string server-side and are not always decoded.
fn settings_from_any<'de, D>(deserializer: D) -> std::result::Result<ThemeSettings, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(ThemeSettings::default()),
        Value::String(raw) if raw.trim().is_empty() => Ok(ThemeSettings::default()),
        Value::String(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
        other => serde_json::from_value(other).map_err(de::Error::custom),
    }
}
