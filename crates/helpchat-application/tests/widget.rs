mod common;

use std::sync::atomic::Ordering;

use common::Harness;
use helpchat_application::{CONNECTION_ERROR_TEXT, DispatchOutcome, WidgetAttributes};
use helpchat_core::message::{Button, FALLBACK_TEXT, Sender};
use helpchat_core::modal::{ActiveModal, ModalKind, SearchKind, TicketStatus};
use helpchat_core::session::{FeedbackVote, WELCOME_TEXT, WidgetStore};
use helpchat_core::theme::{ThemeSelector, ThemeSettings};
use helpchat_core::validation::PROFANITY_ERROR;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_fresh_mount_seeds_welcome_and_persists_session() {
    let harness = Harness::new();
    let widget = harness.widget().await;

    assert_eq!(widget.messages().len(), 1);
    assert_eq!(widget.messages()[0].text, WELCOME_TEXT);
    assert_eq!(widget.messages()[0].buttons.len(), 4);

    let stored = harness.store.load("shop").await.unwrap().unwrap();
    assert_eq!(stored.sender_id.as_deref(), Some(widget.sender_id()));
}

#[tokio::test]
async fn test_remount_restores_sender_and_history() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([{"text": "Hello there"}]));
    widget.send("hi").await;
    let sender = widget.sender_id().to_string();

    let again = harness.widget().await;
    assert_eq!(again.sender_id(), sender);
    assert_eq!(again.messages().len(), 3);
}

#[tokio::test]
async fn test_free_text_exchange_appends_user_then_reply() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness
        .backend
        .reply(json!([{"text": "A"}, {"custom": {"chart": {"type": "bar"}}}]));

    let outcome = widget.send("show me sales").await;

    assert_eq!(outcome, DispatchOutcome::Sent { appended: 1 });
    let messages = widget.messages();
    assert_eq!(messages[1].sender, Sender::User(widget.sender_id().to_string()));
    assert_eq!(messages[1].text, "show me sales");
    assert_eq!(messages[2].text, "A");
    assert_eq!(messages[2].chart, Some(json!({"type": "bar"})));
    assert!(!widget.is_loading());

    let request = harness.backend.requests.lock().unwrap()[0].clone();
    assert_eq!(request.sender, widget.sender_id());
    assert_eq!(request.metadata.app_id, "shop");
}

#[tokio::test]
async fn test_empty_reply_to_free_text_gets_fallback() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([]));

    widget.send("what is the meaning of life").await;

    let last = widget.messages().last().unwrap();
    assert_eq!(last.text, FALLBACK_TEXT);
    assert_eq!(last.buttons.len(), 3);
}

#[tokio::test]
async fn test_empty_reply_to_payload_adds_nothing() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([]));

    let outcome = widget.send("/help").await;

    assert_eq!(outcome, DispatchOutcome::Sent { appended: 0 });
    assert_eq!(widget.messages().len(), 2);
}

#[tokio::test]
async fn test_invalid_input_warns_without_network() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;

    let outcome = widget.send("I am stupid").await;

    assert_eq!(outcome, DispatchOutcome::Rejected(PROFANITY_ERROR.to_string()));
    assert!(harness.backend.sent().is_empty());
    assert_eq!(widget.messages().len(), 2);
    assert_eq!(
        widget.messages()[1].text,
        format!("⚠️ {}", PROFANITY_ERROR)
    );
    assert!(widget.messages()[1].sender.is_bot());
}

#[tokio::test]
async fn test_transport_failure_appends_one_error() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.fail();

    let outcome = widget.send("hello").await;

    assert_eq!(outcome, DispatchOutcome::Sent { appended: 1 });
    assert_eq!(widget.messages().len(), 3);
    assert_eq!(widget.messages()[2].text, CONNECTION_ERROR_TEXT);
    assert!(!widget.is_loading());
    assert_eq!(harness.backend.sent().len(), 1);
}

#[tokio::test]
async fn test_loading_flag_is_set_only_while_backend_is_called() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    let flag = widget.loading_flag();
    harness.backend.watch_loading(flag.clone());
    harness.backend.reply(json!([{"text": "hi"}]));
    harness.backend.fail();

    assert!(!flag.load(Ordering::SeqCst));
    widget.send("hello").await;
    assert!(!flag.load(Ordering::SeqCst));
    widget.send("hello again").await;

    assert_eq!(*harness.backend.loading_seen.lock().unwrap(), vec![true, true]);
    assert!(!flag.load(Ordering::SeqCst));
    assert!(!widget.is_loading());
    assert_eq!(widget.messages().last().unwrap().text, CONNECTION_ERROR_TEXT);
}

#[tokio::test]
async fn test_bare_list_tickets_opens_filter_without_network() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;

    let outcome = widget.send("/list_tickets").await;

    assert_eq!(outcome, DispatchOutcome::ModalOpened(ModalKind::TicketFilter));
    assert!(harness.backend.sent().is_empty());
    assert_eq!(widget.messages().len(), 1);
}

#[tokio::test]
async fn test_choosing_status_sends_and_closes_filter() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    widget.send("/list_tickets").await;
    harness.backend.reply(json!([{"text": "No tickets."}]));

    widget.choose_ticket_status(TicketStatus::Solved).await;

    assert!(widget.active_modal().is_none());
    assert_eq!(
        harness.backend.sent(),
        vec![r#"/list_tickets{"status_id":5}"#.to_string()]
    );
    assert_eq!(widget.messages()[1].text, r#"/list_tickets{"status_id":5}"#);
}

#[tokio::test]
async fn test_list_tickets_with_status_is_sent_directly() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;

    let outcome = widget.send(r#"/list_tickets{"status_id":1}"#).await;

    assert!(matches!(outcome, DispatchOutcome::Sent { .. }));
    assert!(widget.active_modal().is_none());
    assert_eq!(harness.backend.sent().len(), 1);
}

#[tokio::test]
async fn test_button_click_shows_title_and_sends_payload() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([{"text": "Here to help"}]));

    widget.click_button(&Button::new("❓ Help", "/help")).await;

    assert_eq!(widget.messages()[1].text, "❓ Help");
    assert_eq!(harness.backend.sent(), vec!["/help".to_string()]);
}

#[tokio::test]
async fn test_button_for_popup_intent_opens_modal() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    let button = widget.messages()[0].buttons[1].clone();

    let outcome = widget.click_button(&button).await;

    assert_eq!(outcome, DispatchOutcome::ModalOpened(ModalKind::Search));
    match widget.active_modal() {
        Some(ActiveModal::Search(search)) => assert_eq!(search.kind, SearchKind::Order),
        other => panic!("expected order search, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_search_submit_warns_and_stays_open() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    widget.open_search(SearchKind::Product);

    let outcome = widget.submit_modal().await;

    assert!(matches!(outcome, DispatchOutcome::Rejected(_)));
    assert!(widget.active_modal().is_some());
    assert!(harness.backend.sent().is_empty());
}

#[tokio::test]
async fn test_search_submit_escapes_query() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    widget.open_search(SearchKind::Product);
    if let Some(ActiveModal::Search(search)) = widget.active_modal_mut() {
        search.query = r#"17" "monitor""#.to_string();
    }

    widget.submit_modal().await;

    assert_eq!(
        harness.backend.sent(),
        vec![r#"/search_products{"search_query":"17\" \"monitor\""}"#.to_string()]
    );
}

#[tokio::test]
async fn test_opening_a_modal_replaces_the_open_one() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;

    widget.send("/check_status").await;
    widget.send("/update_stock").await;

    assert_eq!(
        widget.active_modal().map(|m| m.kind()),
        Some(ModalKind::StockUpdate)
    );
    widget.cancel_modal();
    assert!(widget.active_modal().is_none());
}

#[tokio::test]
async fn test_ticket_form_flow() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([
        {"text": "Please describe the issue."},
        {"custom": {"ticket_form": {"defaults": {"title": "Broken screen"}}}}
    ]));
    widget.send("/create_ticket").await;
    let message_id = widget.messages()[2].id.clone();

    widget.open_ticket_form(&message_id).unwrap();
    assert!(widget.confirm_ticket_form().is_err());
    if let Some(ActiveModal::TicketForm(form)) = widget.active_modal_mut() {
        form.description = "Cracked on arrival".into();
    }
    widget.confirm_ticket_form().unwrap();
    harness.backend.reply(json!([{"text": "Ticket #12 created."}]));
    widget.submit_modal().await;

    let sent = harness.backend.sent();
    let last = sent.last().unwrap();
    assert!(last.starts_with("/create_ticket{"));
    assert!(last.contains(r#""title":"Broken screen""#));
    assert!(last.contains(r#""priority":"Medium""#));
    assert!(widget.active_modal().is_none());
}

#[tokio::test]
async fn test_set_theme_switches_with_confirmation_only() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;

    let outcome = widget.send("set theme 6").await;

    assert_eq!(outcome, DispatchOutcome::ThemeCommand { switched: true });
    assert_eq!(widget.theme().name, "Modern Dark");
    assert_eq!(widget.messages().len(), 2);
    assert_eq!(widget.messages()[1].text, "Theme switched to \"Modern Dark\".");
    assert!(harness.backend.sent().is_empty());
}

#[tokio::test]
async fn test_set_theme_unknown_keeps_theme() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    let before = widget.theme().clone();

    let outcome = widget.send("set theme 42").await;

    assert_eq!(outcome, DispatchOutcome::ThemeCommand { switched: false });
    assert_eq!(widget.theme(), &before);
    assert_eq!(widget.messages().last().unwrap().text, "Theme 42 not found.");
}

#[tokio::test]
async fn test_set_theme_offline_reports_connection_error() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.admin.go_offline();

    widget.send("set theme 6").await;

    assert_eq!(widget.messages().last().unwrap().text, CONNECTION_ERROR_TEXT);
}

#[tokio::test]
async fn test_theme_resolution_at_mount() {
    let harness = Harness::new();

    let mut attrs = WidgetAttributes::new("shop");
    attrs.theme = Some(ThemeSelector::Id(6));
    assert_eq!(harness.mount(attrs.clone()).await.theme().name, "Modern Dark");

    attrs.theme = Some(ThemeSelector::Color("#ff0000".into()));
    let widget = harness.mount(attrs.clone()).await;
    assert_eq!(widget.theme().settings.primary_color, "#ff0000");

    attrs.theme = Some(ThemeSelector::Id(404));
    let widget = harness.mount(attrs).await;
    assert_eq!(widget.theme().settings, ThemeSettings::default());
}

#[tokio::test]
async fn test_clear_history_resets_session() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([{"text": "Hello"}]));
    widget.send("hi").await;
    let bot_id = widget.messages()[2].id.clone();
    widget.set_feedback(&bot_id, FeedbackVote::Up).await.unwrap();
    let old_sender = widget.sender_id().to_string();

    widget.clear_history().await.unwrap();

    assert_ne!(widget.sender_id(), old_sender);
    assert_eq!(widget.messages().len(), 1);
    assert_eq!(widget.messages()[0].text, WELCOME_TEXT);
    assert!(widget.feedback(&bot_id).is_none());

    let stored = harness.store.load("shop").await.unwrap().unwrap();
    assert_eq!(stored.sender_id.as_deref(), Some(widget.sender_id()));
    assert_eq!(stored.messages.len(), 1);
}

#[tokio::test]
async fn test_feedback_only_on_bot_messages() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([{"text": "Hello"}]));
    widget.send("hi").await;
    let user_id = widget.messages()[1].id.clone();
    let bot_id = widget.messages()[2].id.clone();

    assert!(widget.set_feedback(&user_id, FeedbackVote::Down).await.unwrap_err().is_validation());
    assert!(widget.set_feedback("nope", FeedbackVote::Down).await.unwrap_err().is_not_found());

    widget.set_feedback(&bot_id, FeedbackVote::Down).await.unwrap();
    assert_eq!(widget.feedback(&bot_id), Some(FeedbackVote::Down));
}

#[tokio::test]
async fn test_privacy_notice_persists() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    assert!(!widget.privacy_notice_dismissed());

    widget.dismiss_privacy_notice().await.unwrap();

    assert!(harness.widget().await.privacy_notice_dismissed());
}

#[tokio::test]
async fn test_app_id_scopes_sessions() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    let shop_sender = widget.sender_id().to_string();
    harness.backend.reply(json!([{"text": "Hello"}]));
    widget.send("hi").await;

    widget.set_attribute("app-id", "admin").await.unwrap();
    assert_ne!(widget.sender_id(), shop_sender);
    assert_eq!(widget.messages().len(), 1);

    widget.set_attribute("app-id", "shop").await.unwrap();
    assert_eq!(widget.sender_id(), shop_sender);
    assert_eq!(widget.messages().len(), 3);

    assert!(widget.set_attribute("colour", "x").await.is_err());
    widget.set_attribute("title", "Help Desk").await.unwrap();
    assert_eq!(widget.title(), "Help Desk");
}

#[tokio::test]
async fn test_profile_side_channel_is_stored() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([
        {"text": "Welcome back!"},
        {"custom": {"display_name": "Dana", "admin_me": {"id": 3}}}
    ]));

    widget.send("/admin_token_me").await;

    let profile = widget.profile().unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Dana"));
    assert_eq!(widget.messages().len(), 3);
}

#[tokio::test]
async fn test_save_invoice_writes_decoded_pdf() {
    let harness = Harness::new();
    let mut widget = harness.widget().await;
    harness.backend.reply(json!([
        {"text": "Here is your invoice."},
        {"custom": {"invoice": true, "order_id": 1001, "filename": "../invoice_1001.pdf", "pdf_data": "JVBERi0xLjQ="}}
    ]));
    widget.send("/get_invoice").await;
    let message_id = widget.messages()[2].id.clone();
    let dir = tempfile::TempDir::new().unwrap();

    let path = widget.save_invoice(&message_id, dir.path()).await.unwrap();

    assert_eq!(path, dir.path().join("invoice_1001.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

    let first = widget.messages()[0].id.clone();
    assert!(widget.save_invoice(&first, dir.path()).await.is_err());
}
