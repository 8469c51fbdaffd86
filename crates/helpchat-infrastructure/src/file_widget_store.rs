//! Widget state persisted as one JSON file per app-id.

use std::path::PathBuf;

use async_trait::async_trait;
use helpchat_core::session::{WidgetState, WidgetStore};
use helpchat_core::{HelpchatError, Result};
use tracing::{debug, warn};

use crate::paths::HelpchatPaths;
use crate::storage::{AtomicFile, FileFormat};

/// Stores each widget's state at `<widgets_dir>/<app_id>.json`.
///
/// A file that cannot be decoded is logged and treated as absent so the
/// widget starts fresh instead of failing to mount.
#[derive(Debug, Clone)]
pub struct FileWidgetStore {
    dir: PathBuf,
}

impl FileWidgetStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the default widgets directory.
    pub fn from_paths(paths: &HelpchatPaths) -> Result<Self> {
        Ok(Self::new(paths.widgets_dir()?))
    }

    fn file(&self, app_id: &str) -> AtomicFile<WidgetState> {
        AtomicFile::new(
            self.dir.join(format!("{}.json", file_stem(app_id))),
            FileFormat::Json,
        )
    }
}

/// Maps an app-id to a safe, distinct file name.
///
/// ASCII letters, digits, `-` and `.` pass through; every other byte
/// (including `_` itself and a leading `.`) is written as `_xx` hex, so two
/// different app-ids never share a file.
fn file_stem(app_id: &str) -> String {
    if app_id.is_empty() {
        return "_".to_string();
    }
    let mut stem = String::with_capacity(app_id.len());
    for (i, byte) in app_id.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric() || byte == b'-' || (byte == b'.' && i > 0);
        if keep {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HelpchatError::internal(format!("storage task failed: {}", e)))?
}

#[async_trait]
impl WidgetStore for FileWidgetStore {
    async fn load(&self, app_id: &str) -> Result<Option<WidgetState>> {
        let file = self.file(app_id);
        blocking(move || match file.load() {
            Ok(state) => Ok(state),
            Err(e) if e.is_corrupt() => {
                warn!(
                    "Ignoring unreadable widget state {}: {}",
                    file.path().display(),
                    e
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn save(&self, app_id: &str, state: &WidgetState) -> Result<()> {
        let file = self.file(app_id);
        let state = state.clone();
        debug!("Saving widget state for app '{}'", app_id);
        blocking(move || file.save(&state).map_err(Into::into)).await
    }

    async fn delete(&self, app_id: &str) -> Result<()> {
        let file = self.file(app_id);
        blocking(move || file.remove().map_err(Into::into)).await
    }
}
