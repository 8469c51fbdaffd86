//! Slash payloads: `/intent_name{"inline": "json"}`.

use serde_json::{Map, Value};
use tracing::warn;

use crate::message::fragment::value_to_string;

/// A parsed slash payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashPayload {
    /// Intent name without the leading slash.
    pub intent: String,
    /// Inline JSON parameters, when present and well formed.
    pub params: Option<Map<String, Value>>,
    /// The payload exactly as received.
    pub raw: String,
}

impl SlashPayload {
    /// Parses `input` as a slash payload; returns `None` for free text.
    ///
    /// Malformed inline JSON leaves `params` empty; the raw payload is
    /// still sent verbatim.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix('/')?;

        let (intent, json) = match body.find('{') {
            Some(brace) => (&body[..brace], Some(&body[brace..])),
            None => (body, None),
        };
        let intent = intent.trim();
        if intent.is_empty() || intent.contains(char::is_whitespace) {
            return None;
        }

        let params = json.and_then(|json| match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                warn!("Inline payload for /{} is not an object: {}", intent, other);
                None
            }
            Err(e) => {
                warn!("Malformed inline payload for /{}: {}", intent, e);
                None
            }
        });

        Some(Self {
            intent: intent.to_string(),
            params,
            raw: trimmed.to_string(),
        })
    }

    /// Builds `/<intent>{...}` from an intent and its parameters.
    pub fn build(intent: &str, params: Map<String, Value>) -> String {
        format!("/{}{}", intent, Value::Object(params))
    }

    pub fn has_params(&self) -> bool {
        self.params.is_some()
    }

    /// True when the parameter key is present (any value, even empty).
    pub fn has_param(&self, key: &str) -> bool {
        self.params.as_ref().is_some_and(|p| p.contains_key(key))
    }

    /// Parameter rendered as a plain string; numbers lose no precision.
    pub fn param_str(&self, key: &str) -> Option<String> {
        self.params
            .as_ref()
            .and_then(|p| p.get(key))
            .map(value_to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_intent() {
        let payload = SlashPayload::parse("/list_tickets").unwrap();
        assert_eq!(payload.intent, "list_tickets");
        assert!(!payload.has_params());
    }

    #[test]
    fn test_inline_json() {
        let payload = SlashPayload::parse(r#"/track_order{"order_id": 123}"#).unwrap();
        assert_eq!(payload.intent, "track_order");
        assert_eq!(payload.param_str("order_id").as_deref(), Some("123"));
    }

    #[test]
    fn test_free_text_is_not_a_payload() {
        assert!(SlashPayload::parse("hello").is_none());
        assert!(SlashPayload::parse("/ not an intent").is_none());
        assert!(SlashPayload::parse("/").is_none());
    }

    #[test]
    fn test_malformed_json_keeps_raw() {
        let payload = SlashPayload::parse(r#"/check_stock{"product_id": }"#).unwrap();
        assert_eq!(payload.intent, "check_stock");
        assert!(payload.params.is_none());
        assert_eq!(payload.raw, r#"/check_stock{"product_id": }"#);
    }

    #[test]
    fn test_build_escapes_values() {
        let mut params = Map::new();
        params.insert("search_query".into(), json!("24\" \"monitor\""));
        let built = SlashPayload::build("search_products", params);
        let reparsed = SlashPayload::parse(&built).unwrap();
        assert_eq!(
            reparsed.param_str("search_query").as_deref(),
            Some("24\" \"monitor\"")
        );
    }
}
