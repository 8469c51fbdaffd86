use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helpchat_application::console::{ConfigController, KNOWN_CONFIG_KEYS, MASK, is_secret_key};
use helpchat_core::admin::AdminApi;

use super::{Output, heading, parse_pair, report, row};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show every setting, secrets masked
    Show {
        /// Print secret values in clear text
        #[arg(long)]
        reveal: bool,
    },
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Change several settings at once
    Save {
        #[arg(value_name = "KEY=VALUE", value_parser = parse_pair, required = true)]
        pairs: Vec<(String, String)>,
    },
    /// List the settings the server understands
    Keys,
}

pub async fn run(api: Arc<dyn AdminApi>, action: ConfigAction, out: &Output) -> Result<()> {
    let mut config = ConfigController::new(api);

    match action {
        ConfigAction::Show { reveal } => {
            config.load().await?;
            let shown: BTreeMap<String, String> = if reveal {
                config.values().clone()
            } else {
                config.rendered().into_iter().collect()
            };
            out.show(&shown, |shown| {
                heading("Settings");
                for (key, value) in shown {
                    row(key, value);
                }
            })?;
        }
        ConfigAction::Get { key } => {
            let value = config.get(&key).await?;
            let shown = if is_secret_key(&key) && !value.is_empty() {
                MASK.to_string()
            } else {
                value
            };
            out.show(&shown, |shown| println!("{}", shown))?;
        }
        ConfigAction::Set { key, value } => {
            if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                eprintln!(
                    "{}",
                    format!("'{}' is not a known setting, saving anyway.", key).yellow()
                );
            }
            report(config.set(&key, &value).await)?;
        }
        ConfigAction::Save { pairs } => {
            report(config.save(pairs.into_iter().collect()).await)?;
        }
        ConfigAction::Keys => {
            out.show(&KNOWN_CONFIG_KEYS, |keys| {
                for key in keys {
                    let note = if is_secret_key(key) { " (secret)" } else { "" };
                    println!("{}{}", key, note.bright_black());
                }
            })?;
        }
    }
    Ok(())
}
