//! Application layer for Helpchat.
//!
//! [`ChatWidget`] glues the pure dispatch, reconciliation and modal logic of
//! `helpchat-core` to a conversation backend, a theme source and a widget
//! store. The [`console`] controllers back the admin console screens.

pub mod console;
pub mod factory;
pub mod widget;

pub use factory::WidgetFactory;
pub use widget::{
    CONNECTION_ERROR_TEXT, ChatWidget, DispatchOutcome, WidgetAttribute, WidgetAttributes,
};
