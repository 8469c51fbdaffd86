//! Webhook JSON in, renderable messages out, without any network.

use helpchat_core::command::{Dispatch, classify};
use helpchat_core::message::{FALLBACK_TEXT, ReplyFragment, SendOrigin, reconcile};
use helpchat_core::validation::{ValidationResult, validate_input};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fragments(value: serde_json::Value) -> Vec<ReplyFragment> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_mixed_reply_keeps_every_attachment_once() {
    let reply = fragments(json!([
        {"recipient_id": "s1", "text": "Here is your sales chart"},
        {"recipient_id": "s1", "custom": {"chart": {"type": "bar", "data": [1, 2]}}},
        {"recipient_id": "s1", "custom": {"chart": {"type": "line"}}},
        {"recipient_id": "s1", "text": "Anything else?", "buttons": [
            {"title": "Help", "payload": "/help"}
        ]}
    ]));
    let count = reply.len();

    let result = reconcile(reply, SendOrigin::FreeText);

    assert!(result.messages.len() <= count);
    let charts = result.messages.iter().filter(|m| m.chart.is_some()).count();
    assert_eq!(charts, 2);
    assert_eq!(result.messages[0].text, "Here is your sales chart");
    assert_eq!(result.messages[0].chart, Some(json!({"type": "bar", "data": [1, 2]})));
    assert_eq!(result.messages[1].text, "");
    assert_eq!(result.messages[2].buttons[0].payload, "/help");
}

#[test]
fn test_empty_reply_depends_on_origin() {
    let typed = reconcile(Vec::new(), SendOrigin::FreeText);
    assert_eq!(typed.messages.len(), 1);
    assert_eq!(typed.messages[0].text, FALLBACK_TEXT);
    assert_eq!(typed.messages[0].buttons.len(), 3);

    assert!(reconcile(Vec::new(), SendOrigin::Payload).messages.is_empty());
}

#[test]
fn test_profile_push_is_not_a_message() {
    let result = reconcile(
        fragments(json!([
            {"text": "Welcome back!"},
            {"custom": {"display_name": "Dana", "admin_me": {"id": 7}}}
        ])),
        SendOrigin::Payload,
    );
    assert_eq!(result.messages.len(), 1);
    let profile = result.profile.unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Dana"));
}

#[test]
fn test_inputs_route_before_any_request() {
    assert!(!validate_input("I am stupid").is_valid());
    assert!(matches!(
        validate_input("123-45-6789"),
        ValidationResult::Invalid { .. }
    ));
    assert!(matches!(classify("/list_tickets"), Dispatch::OpenModal(_)));
    assert!(matches!(
        classify(r#"/list_tickets{"status_id":1}"#),
        Dispatch::SendPayload(_)
    ));
    assert_eq!(classify("set theme 6"), Dispatch::SetTheme(6));
}
