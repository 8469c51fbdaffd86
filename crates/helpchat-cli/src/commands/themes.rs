use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::Colorize;
use helpchat_application::console::ThemeController;
use helpchat_core::HelpchatError;
use helpchat_core::admin::AdminApi;
use helpchat_core::backend::ThemeProvider;
use helpchat_core::theme::{Theme, ThemeSettings, ThemeUpdate};

use super::{Output, heading, parse_pair, report, row};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List all themes
    List,
    /// Show one theme with every setting
    Show { id: i64 },
    /// Show the server's default theme
    Default,
    /// Create a theme from the defaults or from an existing theme
    Create {
        name: String,
        /// Copy settings from this theme first
        #[arg(long)]
        from: Option<i64>,
        /// Setting override, e.g. --set primaryColor=#6366F1
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
        settings: Vec<(String, String)>,
        /// Make it the default theme
        #[arg(long)]
        default: bool,
    },
    /// Rename a theme or change its settings
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
        settings: Vec<(String, String)>,
    },
    /// Delete a theme
    Delete { id: i64 },
    /// Make a theme the default
    SetDefault { id: i64 },
    /// List every setting name
    Keys,
}

pub async fn run(api: Arc<dyn AdminApi>, action: ThemeAction, out: &Output) -> Result<()> {
    let mut themes = ThemeController::new(api.clone());

    match action {
        ThemeAction::List => {
            let list = themes.load().await?;
            out.show(list, |list| {
                heading(&format!("Themes ({})", list.len()));
                for theme in list {
                    print_summary(theme);
                }
            })?;
        }
        ThemeAction::Show { id } => {
            let theme = api.theme(id).await?;
            out.show(&theme, print_theme)?;
        }
        ThemeAction::Default => match api.default_theme().await? {
            Some(theme) => out.show(&theme, print_theme)?,
            None => println!("{}", "No default theme is configured.".bright_black()),
        },
        ThemeAction::Create {
            name,
            from,
            settings,
            default,
        } => {
            let mut base = match from {
                Some(id) => api.theme(id).await?.settings,
                None => ThemeSettings::default(),
            };
            apply_settings(&mut base, &settings)?;
            report(themes.create(&name, base, default).await)?;
        }
        ThemeAction::Update { id, name, settings } => {
            if name.is_none() && settings.is_empty() {
                return Err(anyhow!("nothing to update, pass --name or --set"));
            }
            let patch = ThemeUpdate {
                name,
                settings: if settings.is_empty() {
                    None
                } else {
                    let mut current = api.theme(id).await?.settings;
                    apply_settings(&mut current, &settings)?;
                    Some(current)
                },
                is_default: None,
            };
            report(themes.update(id, patch).await)?;
        }
        ThemeAction::Delete { id } => report(themes.delete(id).await)?,
        ThemeAction::SetDefault { id } => report(themes.set_default(id).await)?,
        ThemeAction::Keys => {
            let keys = ThemeSettings::keys();
            out.show(&keys, |keys| {
                for key in keys {
                    println!("{}", key);
                }
            })?;
        }
    }
    Ok(())
}

fn apply_settings(
    settings: &mut ThemeSettings,
    pairs: &[(String, String)],
) -> std::result::Result<(), HelpchatError> {
    for (key, value) in pairs {
        settings.set(key, value)?;
    }
    Ok(())
}

fn print_summary(theme: &Theme) {
    let id = theme.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
    let marker = if theme.is_default {
        " (default)".green().to_string()
    } else {
        String::new()
    };
    println!(
        "  {:>4}  {}{}  {}",
        id.bright_black(),
        theme.name.bold(),
        marker,
        theme.settings.primary_color.bright_black()
    );
}

fn print_theme(theme: &Theme) {
    print_summary(theme);
    if let Ok(serde_json::Value::Object(settings)) = serde_json::to_value(&theme.settings) {
        for (key, value) in settings {
            row(&key, value.as_str().unwrap_or_default());
        }
    }
}
