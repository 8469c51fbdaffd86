//! Widget themes and the `theme-id` attribute.

pub mod model;

use std::fmt;
use std::str::FromStr;

use crate::error::HelpchatError;

pub use model::{NewTheme, Theme, ThemeSettings, ThemeUpdate};

/// Value of the widget's `theme-id` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSelector {
    /// Theme stored server-side, fetched from the admin API.
    Id(i64),
    /// Legacy direct styling with a literal `#rrggbb` primary color.
    Color(String),
}

impl FromStr for ThemeSelector {
    type Err = HelpchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Ok(ThemeSelector::Color(s.to_string()));
            }
        } else if let Ok(id) = s.parse::<i64>() {
            return Ok(ThemeSelector::Id(id));
        }
        Err(HelpchatError::validation(format!(
            "theme-id must be a numeric id or a #rrggbb color, got '{}'",
            s
        )))
    }
}

impl fmt::Display for ThemeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeSelector::Id(id) => write!(f, "{}", id),
            ThemeSelector::Color(color) => f.write_str(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector() {
        assert_eq!("6".parse::<ThemeSelector>().unwrap(), ThemeSelector::Id(6));
        assert_eq!(
            "#1A2b3C".parse::<ThemeSelector>().unwrap(),
            ThemeSelector::Color("#1A2b3C".into())
        );
        assert!("#12345".parse::<ThemeSelector>().is_err());
        assert!("blue".parse::<ThemeSelector>().is_err());
    }
}
