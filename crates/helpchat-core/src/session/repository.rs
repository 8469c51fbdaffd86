//! Widget store trait.

use async_trait::async_trait;

use super::model::WidgetState;
use crate::error::Result;

/// Persistence for widget state, scoped by `app-id`.
///
/// Each `app-id` has a single writer; concurrent writers to the same key are
/// last-write-wins.
#[async_trait]
pub trait WidgetStore: Send + Sync {
    /// Loads the state for `app_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(state))`: state found
    /// - `Ok(None)`: nothing persisted yet
    /// - `Err(_)`: storage failure
    async fn load(&self, app_id: &str) -> Result<Option<WidgetState>>;

    /// Replaces the persisted state for `app_id`.
    async fn save(&self, app_id: &str, state: &WidgetState) -> Result<()>;

    /// Removes everything persisted for `app_id`.
    async fn delete(&self, app_id: &str) -> Result<()>;
}
