//! Keyed validation error sets.

use std::collections::BTreeMap;

/// Error keys used by the built-in rules.
pub mod keys {
    pub const REQUIRED: &str = "required";
    pub const MIN_LENGTH: &str = "min_length";
    pub const MAX_LENGTH: &str = "max_length";
    pub const PATTERN: &str = "pattern";
    pub const EMAIL: &str = "email";
    pub const BANNED_WORD: &str = "banned_word";
    pub const PASSWORD_MISMATCH: &str = "password_mismatch";
    pub const NOT_UNIQUE: &str = "not_unique";
    pub const LOOKUP_FAILED: &str = "lookup_failed";
}

/// A set of validation failures keyed by rule, each carrying a structured
/// detail payload (the offending word, the violated bound, ...).
///
/// Rules return `Option<ValidationErrors>` where `None` means the value
/// passed; a returned set is never empty. Multiple failed rules on one
/// control merge into a single set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    entries: BTreeMap<String, serde_json::Value>,
}

impl ValidationErrors {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single failure.
    pub fn of(key: impl Into<String>, detail: serde_json::Value) -> Self {
        let mut errors = Self::new();
        errors.insert(key, detail);
        errors
    }

    /// Add or replace a failure.
    pub fn insert(&mut self, key: impl Into<String>, detail: serde_json::Value) {
        self.entries.insert(key.into(), detail);
    }

    /// Absorb all failures from `other`, replacing duplicated keys.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.entries.extend(other.entries);
    }

    /// Remove a failure by key, returning its detail if it was present.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.entries.remove(key)
    }

    /// Detail payload for a key, if present.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Whether the set holds a failure for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate failures in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Clear all failures.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `None` when empty, otherwise the set itself. Useful for rules that
    /// accumulate into a set and must never report an empty one.
    pub fn into_option(self) -> Option<ValidationErrors> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, detail) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {detail}")?;
            first = false;
        }
        Ok(())
    }
}
