use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use helpchat_application::WidgetFactory;
use helpchat_application::console::Toast;
use helpchat_core::HelpchatError;
use helpchat_core::admin::AdminApi;
use helpchat_infrastructure::{ConfigOverrides, ConfigService, HelpchatPaths};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Output;
use commands::analytics::AnalyticsAction;
use commands::config::ConfigAction;
use commands::inspector::InspectorAction;
use commands::themes::ThemeAction;

const LOG_ENV: &str = "HELPCHAT_LOG";

#[derive(Parser)]
#[command(name = "helpchat")]
#[command(version, about = "Helpchat admin console - themes, settings, analytics and conversation inspector", long_about = None)]
struct Cli {
    /// Admin API base URL
    #[arg(long, global = true)]
    admin_api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Use DIR for config instead of the platform directory
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage widget themes
    Themes {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Read and change server settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Conversation analytics
    Analytics {
        /// Restrict to one application ("all" for every app)
        #[arg(long, global = true)]
        app: Option<String>,

        #[command(subcommand)]
        action: AnalyticsAction,
    },
    /// Inspect stored conversations and training data
    Inspector {
        #[command(subcommand)]
        action: InspectorAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn admin_api(cli: &Cli) -> Result<Arc<dyn AdminApi>> {
    let paths = HelpchatPaths::new(cli.config_dir.clone());
    let mut config = ConfigService::new(paths.clone()).get_config()?;
    ConfigOverrides {
        admin_api_url: cli.admin_api_url.clone(),
        request_timeout_secs: cli.timeout,
        ..ConfigOverrides::default()
    }
    .apply(&mut config);

    tracing::debug!("Admin API at {}", config.admin_api_url);
    let api: Arc<dyn AdminApi> = WidgetFactory::new(config, paths).admin_api()?;
    Ok(api)
}

async fn run(cli: Cli) -> Result<()> {
    let api = admin_api(&cli)?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Themes { action } => commands::themes::run(api, action, &out).await,
        Commands::Config { action } => commands::config::run(api, action, &out).await,
        Commands::Analytics { app, action } => {
            commands::analytics::run(api, app.as_deref(), action, &out).await
        }
        Commands::Inspector { action } => commands::inspector::run(api, action, &out).await,
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let toast = match err.downcast_ref::<HelpchatError>() {
            Some(err) => Toast::from(err),
            None => Toast::error(format!("{:#}", err)),
        };
        eprintln!("{}", toast.to_string().red());
        std::process::exit(1);
    }
}
