//! Advisory client-side filtering of free-typed messages.
//!
//! This is not a security boundary; the backend enforces its own rules.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_MESSAGE_CHARS: usize = 500;
const CAPS_MIN_CHARS: usize = 20;
const CAPS_MAX_RATIO: f64 = 0.7;

const PROFANITY: &[&str] = &[
    "stupid", "idiot", "moron", "fuck", "shit", "bitch", "bastard", "asshole",
];

static SSN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3}-\d{2}-\d{4}").expect("valid SSN regex"));

static CARD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d{4}[ -]?){3}\d{4}\b").expect("valid card regex"));

pub const PROFANITY_ERROR: &str = "Please keep the conversation respectful.";
pub const SSN_ERROR: &str = "Please don't share sensitive personal information like SSNs.";
pub const CARD_ERROR: &str = "Please don't share credit card numbers.";
pub const LENGTH_ERROR: &str = "Message is too long (maximum 500 characters).";
pub const CAPS_ERROR: &str = "Please avoid typing in all caps.";

/// Outcome of [`validate_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { error: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    fn invalid(error: &str) -> Self {
        ValidationResult::Invalid {
            error: error.to_string(),
        }
    }
}

/// Checks free text against the widget's rules; the first failing rule wins.
pub fn validate_input(input: &str) -> ValidationResult {
    let lowered = input.to_lowercase();
    if PROFANITY.iter().any(|word| lowered.contains(word)) {
        return ValidationResult::invalid(PROFANITY_ERROR);
    }

    if SSN_PATTERN.is_match(input) {
        return ValidationResult::invalid(SSN_ERROR);
    }

    if CARD_PATTERN.is_match(input) {
        return ValidationResult::invalid(CARD_ERROR);
    }

    let length = input.chars().count();
    if length > MAX_MESSAGE_CHARS {
        return ValidationResult::invalid(LENGTH_ERROR);
    }

    if length > CAPS_MIN_CHARS {
        let uppercase = input.chars().filter(|c| c.is_uppercase()).count();
        if uppercase as f64 / length as f64 > CAPS_MAX_RATIO {
            return ValidationResult::invalid(CAPS_ERROR);
        }
    }

    ValidationResult::Valid
}
