//! Configuration service.
//!
//! Loads `config.toml`, creating it with defaults on first run, and layers
//! `HELPCHAT_*` environment variables on top. Command-line flags are applied
//! last by the binaries themselves.

use std::sync::{Arc, RwLock};

use helpchat_core::config::RootConfig;
use helpchat_core::{HelpchatError, Result};
use tracing::{debug, info};

use crate::paths::HelpchatPaths;
use crate::storage::{AtomicFile, FileFormat};

pub const ENV_BACKEND_URL: &str = "HELPCHAT_BACKEND_URL";
pub const ENV_ADMIN_API_URL: &str = "HELPCHAT_ADMIN_API_URL";
pub const ENV_APP_ID: &str = "HELPCHAT_APP_ID";

/// Loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: HelpchatPaths,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: HelpchatPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the effective configuration, reading the file on first access.
    pub fn get_config(&self) -> Result<RootConfig> {
        if let Some(cached) = self.read_cache() {
            return Ok(cached);
        }

        let mut loaded = self.load_or_create()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        *self
            .config
            .write()
            .map_err(|_| HelpchatError::internal("config cache lock poisoned"))? =
            Some(loaded.clone());
        Ok(loaded)
    }

    /// Writes `config` to `config.toml` and drops the cache.
    pub fn save_config(&self, config: &RootConfig) -> Result<()> {
        self.file()?.save(config)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.config.write() {
            *cache = None;
        }
    }

    fn read_cache(&self) -> Option<RootConfig> {
        self.config.read().ok().and_then(|cache| cache.clone())
    }

    fn load_or_create(&self) -> Result<RootConfig> {
        let file = self.file()?;
        match file.load()? {
            Some(config) => {
                debug!("Loaded config from {}", file.path().display());
                Ok(config)
            }
            None => {
                let config = RootConfig::default();
                file.save(&config)?;
                info!("Created default config at {}", file.path().display());
                Ok(config)
            }
        }
    }

    fn file(&self) -> Result<AtomicFile<RootConfig>> {
        Ok(AtomicFile::new(self.paths.config_file()?, FileFormat::Toml))
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub admin_api_url: Option<String>,
    pub app_id: Option<String>,
    pub title: Option<String>,
    pub theme_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut RootConfig) {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(url) = &self.admin_api_url {
            config.admin_api_url = url.clone();
        }
        if let Some(app_id) = &self.app_id {
            config.app_id = app_id.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(theme_id) = &self.theme_id {
            config.theme_id = Some(theme_id.clone());
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
    }
}

/// Overrides config fields from environment variables. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = get(ENV_BACKEND_URL) {
        config.backend_url = url;
    }
    if let Some(url) = get(ENV_ADMIN_API_URL) {
        config.admin_api_url = url;
    }
    if let Some(app_id) = get(ENV_APP_ID) {
        config.app_id = app_id;
    }
}
