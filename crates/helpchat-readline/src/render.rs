//! Terminal rendering of the widget.

use colored::{ColoredString, Colorize};
use helpchat_application::ChatWidget;
use helpchat_core::message::Message;
use helpchat_core::theme::Theme;

pub const PRIVACY_NOTICE: &str =
    "Conversations are stored to improve our support. Type :privacy to dismiss this notice.";

/// Parses `#rrggbb`.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn paint(text: &str, color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.bright_blue(),
    }
}

/// Header line: title, app, signed-in user and theme.
pub fn header(widget: &ChatWidget) -> String {
    let theme = widget.theme();
    let mut line = format!(
        "{} {}",
        paint(&format!("=== {} ===", widget.title()), &theme.settings.primary_color).bold(),
        format!("[app: {}]", widget.app_id()).bright_black()
    );
    if let Some(name) = widget.profile().and_then(|p| p.display_name.as_deref()) {
        line.push_str(&format!(" {}", format!("signed in as {}", name).green()));
    }
    line.push_str(&format!(" {}", format!("theme: {}", theme.name).bright_black()));
    line
}

/// One message with its index, attachments and buttons.
pub fn message(index: usize, message: &Message, theme: &Theme) -> String {
    let settings = &theme.settings;
    let number = format!("[{}]", index).bright_black();
    let mut lines = Vec::new();

    if message.sender.is_bot() {
        lines.push(format!(
            "{} {} {}",
            number,
            settings.bot_icon,
            paint(&message.text, &settings.primary_color)
        ));
    } else {
        lines.push(format!("{} {} {}", number, settings.user_icon, message.text.green()));
    }

    if message.chart.is_some() {
        lines.push(format!("    {}", "[chart]".bright_black()));
    }
    if let Some(video) = &message.video {
        let url = video
            .get("url")
            .or_else(|| video.get("src"))
            .and_then(|v| v.as_str())
            .unwrap_or("video");
        lines.push(format!("    {}", format!("[video: {}]", url).bright_black()));
    }
    if message.ticket_form.is_some() {
        lines.push(format!(
            "    {}",
            format!("[ticket form: :ticket {} to fill it in]", index).yellow()
        ));
    }
    if let Some(invoice) = &message.invoice {
        lines.push(format!(
            "    {}",
            format!(
                "[invoice {} for order {}: :invoice {} to save]",
                invoice.filename, invoice.order_id, index
            )
            .yellow()
        ));
    }
    for (i, button) in message.buttons.iter().enumerate() {
        lines.push(format!(
            "    {} {}",
            format!("#{}", i + 1).bright_black(),
            paint(&button.title, &settings.secondary_color)
        ));
    }
    lines.join("\n")
}

/// Tracks which messages have been printed.
#[derive(Debug, Default)]
pub struct Transcript {
    shown: usize,
}

impl Transcript {
    /// Prints messages appended since the last call.
    ///
    /// A history that shrank (cleared or switched app) is printed in full.
    pub fn flush(&mut self, widget: &ChatWidget) {
        let messages = widget.messages();
        if self.shown > messages.len() {
            self.shown = 0;
        }
        for (i, msg) in messages.iter().enumerate().skip(self.shown) {
            println!("{}", message(i + 1, msg, widget.theme()));
        }
        self.shown = messages.len();
    }

    /// Prints the whole history again.
    pub fn replay(&mut self, widget: &ChatWidget) {
        self.shown = 0;
        self.flush(widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpchat_core::message::Button;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#6366F1"), Some((0x63, 0x66, 0xF1)));
        assert_eq!(parse_hex("6366F1"), None);
        assert_eq!(parse_hex("#63"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_message_lists_buttons_and_attachments() {
        colored::control::set_override(false);
        let mut msg = Message::bot("Pick one").with_buttons(vec![
            Button::new("Track", "/track_order"),
            Button::new("Help", "/help"),
        ]);
        msg.chart = Some(serde_json::json!({"type": "bar"}));
        let rendered = message(3, &msg, &Theme::default());

        assert!(rendered.starts_with("[3] 🤖 Pick one"));
        assert!(rendered.contains("[chart]"));
        assert!(rendered.contains("#2 Help"));
    }
}
