//! Backend reply fragments and their normalization.
//!
//! The webhook answers with an array of loosely shaped objects. Each one is
//! normalized exactly once into a [`NormalizedFragment`] so that the
//! reconciler never probes optional JSON fields itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{Button, Invoice};

/// One raw element of the backend reply array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomPayload>,
}

/// The `custom` (json_message) part of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_form: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_me: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity details the backend pushes after a login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_me: Option<Value>,
}

/// What a normalized fragment contributes to the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Starts a new text bubble.
    Text,
    /// Chart, video, ticket form or invoice without text.
    Attachment,
    /// A bare image URL.
    Image,
    /// Buttons without any text.
    ButtonsOnly,
    /// Nothing renderable.
    Empty,
}

/// A reply fragment with every optional field resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFragment {
    /// Non-empty text only.
    pub text: Option<String>,
    pub buttons: Vec<Button>,
    pub chart: Option<Value>,
    pub video: Option<Value>,
    pub ticket_form: Option<Value>,
    pub invoice: Option<Invoice>,
    pub image: Option<String>,
    pub profile: Option<ProfileUpdate>,
    pub login_error: Option<String>,
}

impl NormalizedFragment {
    pub fn has_attachment(&self) -> bool {
        self.chart.is_some()
            || self.video.is_some()
            || self.ticket_form.is_some()
            || self.invoice.is_some()
    }

    pub fn kind(&self) -> FragmentKind {
        if self.text.is_some() {
            FragmentKind::Text
        } else if self.has_attachment() {
            FragmentKind::Attachment
        } else if self.image.is_some() {
            FragmentKind::Image
        } else if !self.buttons.is_empty() {
            FragmentKind::ButtonsOnly
        } else {
            FragmentKind::Empty
        }
    }
}

impl From<ReplyFragment> for NormalizedFragment {
    fn from(fragment: ReplyFragment) -> Self {
        let ReplyFragment {
            text,
            buttons,
            image,
            chart,
            custom,
            ..
        } = fragment;
        let custom = custom.unwrap_or_default();

        let invoice = if custom.invoice.as_ref().is_some_and(is_truthy) {
            Some(Invoice {
                order_id: custom
                    .order_id
                    .as_ref()
                    .map(value_to_string)
                    .unwrap_or_default(),
                filename: custom.filename.clone().unwrap_or_else(|| {
                    let order = custom.order_id.as_ref().map(value_to_string);
                    format!("invoice_order_{}.pdf", order.unwrap_or_default())
                }),
                pdf_data: custom.pdf_data.clone().filter(|data| !data.is_empty()),
            })
        } else {
            None
        };

        let profile = if custom.display_name.is_some() || custom.admin_me.is_some() {
            Some(ProfileUpdate {
                display_name: custom.display_name.clone(),
                admin_me: custom.admin_me.clone(),
            })
        } else {
            None
        };

        let login_error = if custom.login_error.as_ref().is_some_and(is_truthy) {
            Some(
                custom
                    .error
                    .clone()
                    .unwrap_or_else(|| "login failed".to_string()),
            )
        } else {
            None
        };

        Self {
            text: text.filter(|t| !t.is_empty()),
            buttons: buttons.unwrap_or_default(),
            chart: chart.or(custom.chart),
            video: custom.video,
            ticket_form: custom.ticket_form,
            invoice,
            image: image.filter(|url| !url.is_empty()),
            profile,
            login_error,
        }
    }
}

/// JSON truthiness as the widget evaluates it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a scalar JSON value without quotes.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
