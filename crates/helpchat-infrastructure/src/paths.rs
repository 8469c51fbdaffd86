//! Path management for Helpchat configuration and data files.
//!
//! ```text
//! ~/.config/helpchat/          # Config directory
//! ├── config.toml              # Root configuration
//! └── logs/                    # Chat client logs
//!     └── helpchat-chat.log.YYYY-MM-DD
//!
//! ~/.local/share/helpchat/     # Data directory
//! ├── widgets/                 # One JSON file per app-id
//! └── invoices/                # Saved invoice PDFs
//! ```
//!
//! Tests and portable setups pass an explicit base directory, in which case
//! both the config and the data directory collapse into it.

use std::path::PathBuf;

use helpchat_core::HelpchatError;
use thiserror::Error;

const APP_DIR: &str = "helpchat";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for HelpchatError {
    fn from(err: PathError) -> Self {
        HelpchatError::config(err.to_string())
    }
}

/// Resolves every file location Helpchat uses.
#[derive(Debug, Clone, Default)]
pub struct HelpchatPaths {
    base_dir: Option<PathBuf>,
}

impl HelpchatPaths {
    /// Creates a resolver; `None` uses the platform directories.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Directory holding persisted widget state, one file per app-id.
    pub fn widgets_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("widgets"))
    }

    /// Default destination for saved invoice PDFs.
    pub fn invoices_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("invoices"))
    }
}
