//! File-backed persistence and configuration for Helpchat.

pub mod config_service;
pub mod file_widget_store;
pub mod memory_widget_store;
pub mod paths;
pub mod storage;

pub use config_service::{ConfigOverrides, ConfigService};
pub use file_widget_store::FileWidgetStore;
pub use memory_widget_store::InMemoryWidgetStore;
pub use paths::{HelpchatPaths, PathError};
