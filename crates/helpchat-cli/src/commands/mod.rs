pub mod analytics;
pub mod config;
pub mod inspector;
pub mod themes;

use anyhow::{Result, bail};
use colored::Colorize;
use helpchat_application::console::Toast;
use serde::Serialize;

/// Chooses between human-readable output and raw JSON.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as JSON in `--json` mode, otherwise runs `human`.
    pub fn show<T, F>(&self, value: &T, human: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T),
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Prints a successful toast; a failed one becomes the command's error.
pub fn report(toast: Toast) -> Result<()> {
    if !toast.is_success() {
        bail!(toast.text);
    }
    println!("{}", toast.to_string().green());
    Ok(())
}

/// Parses `key=value`.
pub fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

pub fn heading(text: &str) {
    println!("{}", text.bright_magenta().bold());
}

/// Fixed-width `key  value` row.
pub fn row(key: &str, value: impl std::fmt::Display) {
    println!("  {:<28} {}", key.bright_black(), value);
}

/// Rates arrive already scaled to 0..100.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("primaryColor=#ffffff").unwrap(),
            ("primaryColor".to_string(), "#ffffff".to_string())
        );
        assert_eq!(
            parse_pair("WIDGET_TITLE=a=b").unwrap(),
            ("WIDGET_TITLE".to_string(), "a=b".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_failed_toast_is_an_error() {
        let err = report(Toast::error("Theme not found")).unwrap_err();
        assert_eq!(err.to_string(), "Theme not found");
        assert!(report(Toast::success("ok")).is_ok());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(75.64), "75.6%");
    }
}
