//! Reply reconciliation: backend fragments in, renderable messages out.

use tracing::{debug, warn};

use super::fragment::{FragmentKind, NormalizedFragment, ProfileUpdate, ReplyFragment};
use super::model::{Button, Message};

/// Text of the locally synthesized message when a free-text send got no reply.
pub const FALLBACK_TEXT: &str =
    "I'm not sure how to help with that. Here are some things I can do:";

/// The three suggestions offered by the fallback message.
pub fn fallback_buttons() -> Vec<Button> {
    vec![
        Button::new("🔍 Search Products", "/search_products"),
        Button::new("🛒 Track Order", "/track_order"),
        Button::new("❓ Help", "/help"),
    ]
}

/// How the request that produced a reply was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOrigin {
    /// The user typed the message.
    FreeText,
    /// A button, quick action or modal submission sent a slash payload.
    Payload,
}

/// Result of reconciling one reply array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Messages to append, in order.
    pub messages: Vec<Message>,
    /// Latest profile details pushed by the backend, if any.
    pub profile: Option<ProfileUpdate>,
}

/// Converts one backend reply array into the messages to append.
///
/// Text fragments open a new bubble. Attachment-only fragments (chart, video,
/// ticket form, invoice) are merged into the most recent text bubble of this
/// reply when that slot is still free, and otherwise become a standalone
/// bubble with empty text. Image-only fragments render as a markdown image;
/// an image riding on an attachment fragment becomes that bubble's text, or
/// its own bubble when every attachment merged.
/// Fragments with nothing renderable are dropped.
pub fn reconcile(fragments: Vec<ReplyFragment>, origin: SendOrigin) -> Reconciliation {
    if fragments.is_empty() {
        let messages = match origin {
            SendOrigin::FreeText => {
                vec![Message::bot(FALLBACK_TEXT).with_buttons(fallback_buttons())]
            }
            SendOrigin::Payload => Vec::new(),
        };
        return Reconciliation {
            messages,
            profile: None,
        };
    }

    let mut messages: Vec<Message> = Vec::with_capacity(fragments.len());
    let mut last_text: Option<usize> = None;
    let mut profile = None;

    for fragment in fragments {
        let fragment = NormalizedFragment::from(fragment);

        if let Some(update) = fragment.profile.clone() {
            profile = Some(update);
        }
        if let Some(error) = fragment.login_error.as_deref() {
            warn!("Backend reported a login error: {}", error);
        }

        match fragment.kind() {
            FragmentKind::Text => {
                messages.push(text_message(fragment));
                last_text = Some(messages.len() - 1);
            }
            FragmentKind::Attachment => {
                let image = fragment.image.as_deref().map(image_markdown);
                match (merge_attachments(&mut messages, last_text, fragment), image) {
                    (Some(mut standalone), Some(image)) => {
                        standalone.text = image;
                        messages.push(standalone);
                    }
                    (Some(standalone), None) => messages.push(standalone),
                    (None, Some(image)) => messages.push(Message::bot(image)),
                    (None, None) => {}
                }
            }
            FragmentKind::Image => {
                let url = fragment.image.unwrap_or_default();
                messages.push(Message::bot(image_markdown(&url)));
            }
            FragmentKind::ButtonsOnly => match last_text {
                Some(index) => messages[index].buttons.extend(fragment.buttons),
                None => debug!("Dropping button-only fragment with no text to attach to"),
            },
            FragmentKind::Empty => {}
        }
    }

    Reconciliation { messages, profile }
}

fn image_markdown(url: &str) -> String {
    format!("![image]({})", url)
}

fn text_message(fragment: NormalizedFragment) -> Message {
    let mut text = fragment.text.unwrap_or_default();
    if let Some(url) = fragment.image.as_deref() {
        text.push_str("\n\n");
        text.push_str(&image_markdown(url));
    }

    let mut message = Message::bot(text).with_buttons(fragment.buttons);
    message.chart = fragment.chart;
    message.video = fragment.video;
    message.ticket_form = fragment.ticket_form;
    message.invoice = fragment.invoice;
    message
}

/// Moves each attachment into the last text message when its slot is free.
///
/// Whatever cannot be merged is returned as a standalone message.
fn merge_attachments(
    messages: &mut [Message],
    last_text: Option<usize>,
    fragment: NormalizedFragment,
) -> Option<Message> {
    let mut standalone = Message::bot("");

    match last_text {
        Some(index) => {
            let target = &mut messages[index];
            place(&mut target.chart, &mut standalone.chart, fragment.chart);
            place(&mut target.video, &mut standalone.video, fragment.video);
            place(
                &mut target.ticket_form,
                &mut standalone.ticket_form,
                fragment.ticket_form,
            );
            place(&mut target.invoice, &mut standalone.invoice, fragment.invoice);
        }
        None => {
            standalone.chart = fragment.chart;
            standalone.video = fragment.video;
            standalone.ticket_form = fragment.ticket_form;
            standalone.invoice = fragment.invoice;
        }
    }

    standalone.buttons = fragment.buttons;
    if standalone.chart.is_none()
        && standalone.video.is_none()
        && standalone.ticket_form.is_none()
        && standalone.invoice.is_none()
    {
        // Every attachment merged; keep any stray buttons with the target.
        if !standalone.buttons.is_empty() {
            if let Some(index) = last_text {
                messages[index].buttons.append(&mut standalone.buttons);
            }
        }
        return None;
    }
    Some(standalone)
}

fn place<T>(target: &mut Option<T>, overflow: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        if target.is_none() {
            *target = Some(value);
        } else {
            *overflow = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn fragments(value: Value) -> Vec<ReplyFragment> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_chart_merges_into_preceding_text() {
        let out = reconcile(
            fragments(json!([{"text": "A"}, {"custom": {"chart": {"type": "bar"}}}])),
            SendOrigin::FreeText,
        );
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, "A");
        assert_eq!(out.messages[0].chart, Some(json!({"type": "bar"})));
    }

    #[test]
    fn test_chart_alone_is_standalone() {
        let out = reconcile(
            fragments(json!([{"custom": {"chart": {"type": "pie"}}}])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, "");
        assert_eq!(out.messages[0].chart, Some(json!({"type": "pie"})));
    }

    #[test]
    fn test_image_with_chart_keeps_both() {
        let out = reconcile(
            fragments(json!([{"image": "https://x/y.png", "custom": {"chart": {"type": "bar"}}}])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, "![image](https://x/y.png)");
        assert_eq!(out.messages[0].chart, Some(json!({"type": "bar"})));
    }

    #[test]
    fn test_image_survives_when_chart_merges_into_text() {
        let out = reconcile(
            fragments(json!([
                {"text": "A"},
                {"image": "https://x/y.png", "custom": {"chart": {"type": "bar"}}}
            ])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 2);
        assert_eq!(out.messages[0].text, "A");
        assert_eq!(out.messages[0].chart, Some(json!({"type": "bar"})));
        assert_eq!(out.messages[1].text, "![image](https://x/y.png)");
        assert!(out.messages[1].chart.is_none());
    }

    #[test]
    fn test_empty_reply_to_free_text_yields_fallback() {
        let out = reconcile(Vec::new(), SendOrigin::FreeText);
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, FALLBACK_TEXT);
        assert_eq!(out.messages[0].buttons.len(), 3);
        assert!(out.messages[0].sender.is_bot());
    }

    #[test]
    fn test_empty_reply_to_payload_yields_nothing() {
        let out = reconcile(Vec::new(), SendOrigin::Payload);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn test_video_and_ticket_form_merge_independently() {
        let out = reconcile(
            fragments(json!([
                {"text": "Here you go", "buttons": [{"title": "Help", "payload": "/help"}]},
                {"custom": {"video": {"url": "v.mp4"}}},
                {"custom": {"ticket_form": {"fields": ["title"]}}}
            ])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 1);
        let message = &out.messages[0];
        assert_eq!(message.buttons.len(), 1);
        assert_eq!(message.video, Some(json!({"url": "v.mp4"})));
        assert_eq!(message.ticket_form, Some(json!({"fields": ["title"]})));
    }

    #[test]
    fn test_second_chart_does_not_overwrite_first() {
        let out = reconcile(
            fragments(json!([
                {"text": "Stats"},
                {"custom": {"chart": 1}},
                {"custom": {"chart": 2}}
            ])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 2);
        assert_eq!(out.messages[0].chart, Some(json!(1)));
        assert_eq!(out.messages[1].chart, Some(json!(2)));
        assert_eq!(out.messages[1].text, "");
    }

    #[test]
    fn test_image_fragment_becomes_markdown() {
        let out = reconcile(
            fragments(json!([{"image": "https://x/y.png"}])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages[0].text, "![image](https://x/y.png)");
    }

    #[test]
    fn test_each_text_starts_new_message_and_merges_target_latest() {
        let out = reconcile(
            fragments(json!([
                {"text": "one"},
                {"text": "two"},
                {"custom": {"chart": {"k": "v"}}}
            ])),
            SendOrigin::Payload,
        );
        assert_eq!(out.messages.len(), 2);
        assert!(out.messages[0].chart.is_none());
        assert_eq!(out.messages[1].chart, Some(json!({"k": "v"})));
    }

    #[test]
    fn test_unrenderable_fragments_are_dropped() {
        let out = reconcile(
            fragments(json!([
                {"recipient_id": "x"},
                {"custom": {"display_name": "Ada"}},
                {"text": "hi"}
            ])),
            SendOrigin::FreeText,
        );
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].text, "hi");
        assert_eq!(out.profile.unwrap().display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_invoice_captured_on_text_message() {
        let out = reconcile(
            fragments(json!([{
                "text": "Download",
                "custom": {"invoice": true, "order_id": "9", "filename": "i.pdf"}
            }])),
            SendOrigin::Payload,
        );
        let invoice = out.messages[0].invoice.as_ref().unwrap();
        assert_eq!(invoice.order_id, "9");
        assert_eq!(invoice.filename, "i.pdf");
    }

    #[test]
    fn test_output_never_longer_than_input_and_never_empty() {
        let input = json!([
            {"text": "a"},
            {"custom": {"chart": 1, "video": 2}},
            {"image": "u"},
            {"buttons": [{"title": "t", "payload": "/p"}]},
            {},
            {"custom": {"ticket_form": {}}},
            {"text": "b", "image": "w"}
        ]);
        let count = input.as_array().unwrap().len();
        let out = reconcile(fragments(input), SendOrigin::Payload);

        assert!(out.messages.len() <= count);
        assert!(out.messages.iter().all(|m| !m.is_empty()));

        let charts = out.messages.iter().filter(|m| m.chart.is_some()).count();
        let videos = out.messages.iter().filter(|m| m.video.is_some()).count();
        let forms = out.messages.iter().filter(|m| m.ticket_form.is_some()).count();
        let images = out
            .messages
            .iter()
            .filter(|m| m.text.contains("![image]"))
            .count();
        assert_eq!((charts, videos, forms, images), (1, 1, 1, 2));
    }
}
