use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helpchat_application::console::AnalyticsController;
use helpchat_core::admin::AdminApi;

use super::{Output, heading, percent, row};

#[derive(Subcommand)]
pub enum AnalyticsAction {
    /// List registered chat applications
    Apps,
    /// Headline numbers
    Summary,
    /// Intent distribution
    Intents,
    /// Thumbs up and down totals
    Feedback,
    /// Most recent conversations
    Conversations,
    /// Star-rating distribution
    Satisfaction {
        /// Only count the last N days
        #[arg(long)]
        days: Option<u32>,
    },
}

pub async fn run(
    api: Arc<dyn AdminApi>,
    app: Option<&str>,
    action: AnalyticsAction,
    out: &Output,
) -> Result<()> {
    let mut analytics = AnalyticsController::new(api);
    analytics.set_app_filter(app);
    let scope = analytics.app_filter().unwrap_or("all apps").to_string();

    match action {
        AnalyticsAction::Apps => {
            let apps = analytics.apps().await?;
            out.show(apps, |apps| {
                heading("Applications");
                for app in apps {
                    let state = if app.is_active { "active".green() } else { "inactive".red() };
                    println!("  {:<20} {:<24} {}", app.app_id.bold(), app.name, state);
                }
            })?;
        }
        AnalyticsAction::Summary => {
            let summary = analytics.summary().await?;
            out.show(summary, |s| {
                heading(&format!("Summary ({})", scope));
                row("conversations", s.total_conversations);
                row("conversations today", s.conversations_today);
                row("messages", s.total_messages);
                row("positive feedback", s.feedback_positive);
                row("negative feedback", s.feedback_negative);
                row("resolution rate", percent(s.resolution_rate));
                for (intent, count) in &s.top_intents {
                    row(&format!("top: {}", intent), count);
                }
            })?;
        }
        AnalyticsAction::Intents => {
            let intents = analytics.intents().await?;
            out.show(intents, |d| {
                heading(&format!("Intents ({})", scope));
                let mut counts: Vec<_> = d.intents.iter().collect();
                counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                for (intent, count) in counts {
                    row(intent, count);
                }
            })?;
        }
        AnalyticsAction::Feedback => {
            let feedback = analytics.feedback().await?;
            out.show(feedback, |f| {
                heading(&format!("Feedback ({})", scope));
                row("positive", f.positive);
                row("negative", f.negative);
                row("resolution rate", percent(f.resolution_rate));
            })?;
        }
        AnalyticsAction::Conversations => {
            let conversations = analytics.conversations().await?;
            out.show(conversations, |list| {
                heading(&format!("Recent conversations ({})", scope));
                for c in list {
                    let resolved = if c.resolved { "resolved".green() } else { "open".yellow() };
                    println!(
                        "  {}  {:<12} {:>4} msgs  {}  {}",
                        c.started_at.as_deref().unwrap_or("-").bright_black(),
                        c.app_id,
                        c.message_count,
                        resolved,
                        c.sender_id
                    );
                }
            })?;
        }
        AnalyticsAction::Satisfaction { days } => {
            let ratings = analytics.satisfaction(days).await?;
            out.show(ratings, |r| {
                let window = days.map_or("all time".to_string(), |d| format!("last {} days", d));
                heading(&format!("Satisfaction ({})", window));
                for stars in 1..=5 {
                    let count = r.ratings.get(&stars.to_string()).copied().unwrap_or(0);
                    row(&"★".repeat(stars), count);
                }
                row("average", format!("{:.2}", r.average));
                row("total", r.total);
            })?;
        }
    }
    Ok(())
}
