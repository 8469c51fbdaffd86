use std::collections::BTreeMap;
use std::sync::Arc;

use helpchat_core::Result;
use helpchat_core::admin::AdminApi;

use super::Toast;

/// Keys the server always reports, even when unset.
pub const KNOWN_CONFIG_KEYS: [&str; 14] = [
    "RASA_API_URL",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_USER",
    "DB_PASSWORD",
    "DB_DRIVER",
    "WIDGET_TITLE",
    "WIDGET_SUBTITLE",
    "NOP_API_URL",
    "NOP_SECRET_KEY",
    "NOP_ADMIN_USERNAME",
    "NOP_ADMIN_PASSWORD",
    "NOP_VERIFY_SSL",
];

pub const MASK: &str = "********";

/// Whether a key holds a credential that must not be shown.
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("PASSWORD") || key.contains("SECRET")
}

/// Server configuration screen.
pub struct ConfigController {
    api: Arc<dyn AdminApi>,
    values: BTreeMap<String, String>,
}

impl ConfigController {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            values: BTreeMap::new(),
        }
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub async fn load(&mut self) -> Result<&BTreeMap<String, String>> {
        self.values = self.api.get_config().await?;
        Ok(&self.values)
    }

    pub async fn get(&self, key: &str) -> Result<String> {
        self.api.get_config_value(key).await
    }

    pub async fn set(&mut self, key: &str, value: &str) -> Toast {
        match self.api.set_config_value(key, value).await {
            Ok(()) => {
                self.values.insert(key.to_string(), value.to_string());
                Toast::success(format!("{} saved.", key))
            }
            Err(err) => Toast::from(&err),
        }
    }

    pub async fn save(&mut self, values: BTreeMap<String, String>) -> Toast {
        match self.api.save_config(&values).await {
            Ok(()) => {
                let count = values.len();
                self.values.extend(values);
                Toast::success(format!("Saved {} setting(s).", count))
            }
            Err(err) => Toast::from(&err),
        }
    }

    /// Loaded values ready for display, secrets masked.
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| {
                let shown = if is_secret_key(key) && !value.is_empty() {
                    MASK.to_string()
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_keys() {
        assert!(is_secret_key("DB_PASSWORD"));
        assert!(is_secret_key("NOP_SECRET_KEY"));
        assert!(is_secret_key("nop_admin_password"));
        assert!(!is_secret_key("DB_USER"));
        assert!(!is_secret_key("WIDGET_TITLE"));
    }
}
