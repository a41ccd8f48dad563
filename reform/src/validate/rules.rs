//! Built-in synchronous field rules.

use regex::Regex;
use serde_json::json;

use crate::error::FormError;
use crate::value::Value;

use super::errors::{ValidationErrors, keys};

/// A synchronous rule over a single field value.
///
/// The [`key`](Self::key) identifies the rule inside a field's active set
/// and is the key its failures are reported under, which makes runtime
/// add/remove of a rule by key possible.
pub trait Validate: Send + Sync {
    /// Stable identity of this rule.
    fn key(&self) -> &str;

    /// `None` when the value passes, otherwise the failure set.
    fn check(&self, value: &Value) -> Option<ValidationErrors>;
}

/// Fails when the value is null or a blank string.
pub struct Required;

impl Validate for Required {
    fn key(&self) -> &str {
        keys::REQUIRED
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let missing = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        missing.then(|| ValidationErrors::of(keys::REQUIRED, json!(true)))
    }
}

/// Fails when a non-empty string is shorter than `min` characters.
/// Empty and non-string values pass; compose with [`Required`] for presence.
pub struct MinLength {
    min: usize,
}

impl MinLength {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Validate for MinLength {
    fn key(&self) -> &str {
        keys::MIN_LENGTH
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let s = value.as_str()?;
        if s.is_empty() {
            return None;
        }
        let actual = s.chars().count();
        (actual < self.min).then(|| {
            ValidationErrors::of(
                keys::MIN_LENGTH,
                json!({ "required_length": self.min, "actual_length": actual }),
            )
        })
    }
}

/// Fails when a string is longer than `max` characters.
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Validate for MaxLength {
    fn key(&self) -> &str {
        keys::MAX_LENGTH
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let s = value.as_str()?;
        let actual = s.chars().count();
        (actual > self.max).then(|| {
            ValidationErrors::of(
                keys::MAX_LENGTH,
                json!({ "required_length": self.max, "actual_length": actual }),
            )
        })
    }
}

/// Fails when a non-empty string does not match a regular expression.
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Build a pattern rule; the regex is compiled once up front.
    pub fn new(pattern: &str) -> Result<Self, FormError> {
        let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }
}

impl Validate for Pattern {
    fn key(&self) -> &str {
        keys::PATTERN
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let s = value.as_str()?;
        if s.is_empty() || self.regex.is_match(s) {
            return None;
        }
        Some(ValidationErrors::of(
            keys::PATTERN,
            json!({ "pattern": self.regex.as_str(), "actual": s }),
        ))
    }
}

/// Fails when a non-empty string is not a valid email address.
pub struct Email;

impl Validate for Email {
    fn key(&self) -> &str {
        keys::EMAIL
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let s = value.as_str()?;
        if s.is_empty() || email_address::EmailAddress::is_valid(s) {
            return None;
        }
        Some(ValidationErrors::of(keys::EMAIL, json!({ "actual": s })))
    }
}

/// Fails when the trimmed, lowercased value equals a banned entry exactly.
///
/// Whole-value match only; a banned word appearing as a substring passes.
/// Null and non-string values pass.
pub struct BanWords {
    words: Vec<String>,
}

impl BanWords {
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validate for BanWords {
    fn key(&self) -> &str {
        keys::BANNED_WORD
    }

    fn check(&self, value: &Value) -> Option<ValidationErrors> {
        let s = value.as_str()?;
        let candidate = s.trim().to_lowercase();
        let hit = self
            .words
            .iter()
            .find(|word| word.to_lowercase() == candidate)?;
        Some(ValidationErrors::of(
            keys::BANNED_WORD,
            json!({ "word": hit }),
        ))
    }
}
