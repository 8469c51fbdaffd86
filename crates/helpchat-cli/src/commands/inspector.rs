use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helpchat_application::console::{DEFAULT_CONVERSATION_LIMIT, InspectorController};
use helpchat_core::admin::{AdminApi, ConversationDetail};

use super::{Output, heading, row};

#[derive(Subcommand)]
pub enum InspectorAction {
    /// List conversations, newest first
    Conversations {
        #[arg(long, default_value_t = DEFAULT_CONVERSATION_LIMIT)]
        limit: u32,
        /// Only this application
        #[arg(long)]
        app: Option<String>,
    },
    /// Full transcript of one conversation
    Conversation { sender_id: String },
    /// Stories and rules of the bot
    Flows,
    /// Intent statistics
    Intents,
    /// Action success rates
    Actions,
    /// The bot's domain definition
    Domain,
    /// Admin API health
    Health,
}

pub async fn run(api: Arc<dyn AdminApi>, action: InspectorAction, out: &Output) -> Result<()> {
    let mut inspector = InspectorController::new(api);

    match action {
        InspectorAction::Conversations { limit, app } => {
            let list = inspector.conversations(limit, app.as_deref()).await?;
            out.show(list, |list| {
                heading(&format!("Conversations ({})", list.len()));
                for c in list {
                    println!(
                        "  {}  {:<12} {:>4} msgs {:>3} actions  {}{}",
                        c.last_activity.as_deref().unwrap_or("-").bright_black(),
                        c.app_id,
                        c.message_count,
                        c.action_count,
                        c.sender_id,
                        c.feedback
                            .as_deref()
                            .map(|f| format!(" [{}]", f))
                            .unwrap_or_default()
                    );
                }
            })?;
        }
        InspectorAction::Conversation { sender_id } => {
            let detail = inspector.conversation(&sender_id).await?;
            out.show(detail, print_transcript)?;
        }
        InspectorAction::Flows => {
            let flows = inspector.flows().await?;
            out.show(flows, |flows| {
                heading(&format!("Flows ({})", flows.len()));
                for flow in flows {
                    println!(
                        "  {:<6} {} {}",
                        flow.kind.bright_black(),
                        flow.name.bold(),
                        format!("({} steps)", flow.steps.len()).bright_black()
                    );
                }
            })?;
        }
        InspectorAction::Intents => {
            let stats = inspector.intents().await?;
            out.show(stats, |s| {
                heading(&format!("Intents ({} messages)", s.total_intent_messages));
                for (intent, count) in &s.distribution {
                    row(intent, count);
                }
                let unseen: Vec<_> = s
                    .known_intents
                    .iter()
                    .filter(|i| !s.distribution.contains_key(*i))
                    .map(String::as_str)
                    .collect();
                if !unseen.is_empty() {
                    row("never seen", unseen.join(", "));
                }
            })?;
        }
        InspectorAction::Actions => {
            let actions = inspector.actions().await?;
            out.show(actions, |actions| {
                heading("Actions");
                for a in actions {
                    row(
                        &a.action,
                        format!("{} ok / {} failed ({:.1}%)", a.success, a.failure, a.success_rate),
                    );
                }
            })?;
        }
        InspectorAction::Domain => {
            let domain = inspector.domain().await?;
            println!("{}", serde_json::to_string_pretty(domain)?);
        }
        InspectorAction::Health => {
            let health = inspector.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }
    Ok(())
}

fn print_transcript(detail: &ConversationDetail) {
    let info = &detail.conversation;
    heading(&format!("Conversation {}", info.sender_id));
    row("app", &info.app_id);
    row("user", &info.user_id);
    row("started", info.started_at.as_deref().unwrap_or("-"));
    row("resolved", info.resolved);
    row(
        "messages",
        format!(
            "{} ({} user, {} bot)",
            detail.stats.total_messages, detail.stats.user_messages, detail.stats.bot_messages
        ),
    );
    println!();

    for message in &detail.messages {
        let intent = message
            .intent
            .as_deref()
            .map(|i| format!(" [{}]", i).bright_black().to_string())
            .unwrap_or_default();
        if message.sender == "user" {
            println!("  {} {}{}", "user ›".green(), message.text, intent);
        } else {
            println!("  {} {}", "bot  ›".bright_blue(), message.text);
        }
    }

    if !detail.actions.is_empty() {
        println!();
        for action in &detail.actions {
            let mark = if action.success { "✓".green() } else { "✗".red() };
            println!("  {} {}", mark, action.action);
        }
    }
    for feedback in &detail.feedback {
        row("feedback", &feedback.kind);
    }
}
