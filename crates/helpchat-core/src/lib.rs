//! Core domain of Helpchat: messages, reply reconciliation, command
//! classification, modal state machines, themes and the traits the outer
//! layers implement.

pub mod admin;
pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod modal;
pub mod payload;
pub mod session;
pub mod theme;
pub mod validation;

mod serde_util;

// Re-export common error type
pub use error::{HelpchatError, Result};
