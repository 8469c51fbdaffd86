mod commands;
mod helper;
mod modal_prompt;
mod render;
mod typing;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use helpchat_application::{ChatWidget, DispatchOutcome, WidgetFactory};
use helpchat_infrastructure::{ConfigOverrides, ConfigService, HelpchatPaths};
use rustyline::error::ReadlineError;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use commands::MetaCommand;
use helper::CliHelper;
use modal_prompt::ChatEditor;
use render::Transcript;

const LOG_ENV: &str = "HELPCHAT_LOG";

/// Terminal chat widget for a webhook-based support bot.
#[derive(Parser, Debug)]
#[command(name = "helpchat-chat", version, about, long_about = None)]
struct Args {
    /// Conversational backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Admin API base URL (themes)
    #[arg(long)]
    admin_api_url: Option<String>,

    /// Application id the conversation belongs to
    #[arg(long)]
    app_id: Option<String>,

    /// Header title
    #[arg(long)]
    title: Option<String>,

    /// Theme id or #rrggbb primary color
    #[arg(long)]
    theme_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Keep the conversation in memory only
    #[arg(long)]
    no_persist: bool,

    /// Use DIR for config, state and logs instead of the platform directories
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend_url: self.backend_url.clone(),
            admin_api_url: self.admin_api_url.clone(),
            app_id: self.app_id.clone(),
            title: self.title.clone(),
            theme_id: self.theme_id.clone(),
            request_timeout_secs: self.timeout,
        }
    }
}

/// Logs go to a daily file so they never interleave with the conversation.
fn init_logging(paths: &HelpchatPaths) -> Result<WorkerGuard> {
    let dir = paths.logs_dir()?;
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "helpchat-chat.log"));

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let paths = HelpchatPaths::new(args.config_dir.clone());
    let _log_guard = init_logging(&paths)?;

    let mut config = ConfigService::new(paths.clone()).get_config()?;
    args.overrides().apply(&mut config);

    let mut factory = WidgetFactory::new(config, paths.clone());
    if args.no_persist {
        factory = factory.without_persistence();
    }
    let mut widget = factory.mount_widget().await?;
    info!(
        "Widget mounted for app '{}' as sender {}",
        widget.app_id(),
        widget.sender_id()
    );

    let mut rl: ChatEditor = ChatEditor::new()?;
    rl.set_helper(Some(CliHelper::new()));
    let mut transcript = Transcript::default();

    println!("{}", render::header(&widget));
    println!(
        "{}",
        "Type a message, :help for commands, or 'quit' to exit.".bright_black()
    );
    if !widget.privacy_notice_dismissed() {
        println!("{}", render::PRIVACY_NOTICE.yellow());
    }
    transcript.flush(&widget);

    loop {
        let prompt = if widget.active_modal().is_some() {
            "(form open, :modal) >> "
        } else {
            ">> "
        };
        match rl.readline(prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;

                if matches!(input, "quit" | "exit") {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                let outcome = match commands::parse(input) {
                    Ok(Some(command)) => {
                        match run_command(command, &mut widget, &paths, &mut transcript).await {
                            Ok(outcome) => outcome,
                            Err(err) => {
                                eprintln!("{}", format!("✗ {:#}", err).red());
                                None
                            }
                        }
                    }
                    Ok(None) => {
                        Some(typing::while_waiting(widget.loading_flag(), widget.send(input)).await)
                    }
                    Err(err) => {
                        eprintln!("{}", format!("✗ {:#}", err).red());
                        None
                    }
                };

                if let Some(outcome) = outcome {
                    handle_outcome(outcome, &mut widget, &mut rl, &mut transcript).await?;
                }
                transcript.flush(&widget);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle_outcome(
    outcome: DispatchOutcome,
    widget: &mut ChatWidget,
    rl: &mut ChatEditor,
    transcript: &mut Transcript,
) -> Result<()> {
    match outcome {
        DispatchOutcome::ModalOpened(_) => {
            transcript.flush(widget);
            modal_prompt::run(widget, rl, transcript).await?;
        }
        DispatchOutcome::ThemeCommand { switched: true } => {
            println!("{}", render::header(widget));
        }
        DispatchOutcome::Sent { .. }
        | DispatchOutcome::Rejected(_)
        | DispatchOutcome::ThemeCommand { switched: false }
        | DispatchOutcome::Ignored => {}
    }
    Ok(())
}

/// Runs a local command. Commands that send something return the outcome.
async fn run_command(
    command: MetaCommand,
    widget: &mut ChatWidget,
    paths: &HelpchatPaths,
    transcript: &mut Transcript,
) -> Result<Option<DispatchOutcome>> {
    match command {
        MetaCommand::Help => println!("{}", commands::usage()),
        MetaCommand::Clear => {
            widget.clear_history().await?;
            println!("{}", "Started a new conversation.".bright_black());
            transcript.replay(widget);
        }
        MetaCommand::Button(n) => {
            let button = commands::latest_buttons(widget.messages())
                .get(n - 1)
                .cloned()
                .ok_or_else(|| anyhow!("there is no button #{}", n))?;
            let sent = typing::while_waiting(widget.loading_flag(), widget.click_button(&button));
            return Ok(Some(sent.await));
        }
        MetaCommand::Search(kind) => return Ok(Some(widget.open_search(kind))),
        MetaCommand::TicketForm(n) => {
            let id = commands::message_id(widget.messages(), n)?;
            widget.open_ticket_form(&id)?;
            return Ok(widget.active_modal().map(|m| DispatchOutcome::ModalOpened(m.kind())));
        }
        MetaCommand::Vote(n, vote) => {
            let id = commands::message_id(widget.messages(), n)?;
            widget.set_feedback(&id, vote).await?;
            println!("{}", format!("✓ Thanks for your feedback ({}).", vote).green());
        }
        MetaCommand::Invoice(n, dir) => {
            let id = commands::message_id(widget.messages(), n)?;
            let dir = match dir {
                Some(dir) => dir,
                None => paths.invoices_dir()?,
            };
            let path = widget.save_invoice(&id, &dir).await?;
            println!("{}", format!("✓ Saved {}", path.display()).green());
        }
        MetaCommand::SetAttribute(name, value) => {
            let previous_app = widget.app_id().to_string();
            widget.set_attribute(&name, &value).await?;
            println!("{}", render::header(widget));
            if widget.app_id() != previous_app {
                transcript.replay(widget);
            }
        }
        MetaCommand::DismissPrivacy => {
            widget.dismiss_privacy_notice().await?;
            println!("{}", "Privacy notice dismissed.".bright_black());
        }
        MetaCommand::Theme => {
            let theme = widget.theme();
            let id = theme.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            println!("{} (id {})", theme.name.bold(), id);
            if let Ok(settings) = serde_json::to_string_pretty(&theme.settings) {
                println!("{}", settings);
            }
        }
        MetaCommand::History => transcript.replay(widget),
        MetaCommand::Modal => {
            let kind = widget
                .active_modal()
                .map(|m| m.kind())
                .ok_or_else(|| anyhow!("no form is open"))?;
            return Ok(Some(DispatchOutcome::ModalOpened(kind)));
        }
    }
    Ok(None)
}
