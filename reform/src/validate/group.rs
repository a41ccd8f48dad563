//! Cross-field rules scoped to a group.

use serde_json::json;

use crate::value::Value;

use super::errors::{ValidationErrors, keys};

/// Snapshot of a group's direct children at validation time.
///
/// Group rules run against a snapshot rather than the live controls, so
/// a rule cannot mutate the tree mid-validation.
#[derive(Debug, Clone)]
pub struct GroupValues {
    entries: Vec<(String, Value)>,
}

impl GroupValues {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    /// Value of the named child, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    /// String value of the named child, if present and a string.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

/// A rule over a group of sibling fields. Failures are scoped to the
/// group, not to any individual child.
pub trait ValidateGroup: Send + Sync {
    /// Stable identity of this rule.
    fn key(&self) -> &str;

    /// `None` when the group passes, otherwise the failure set.
    fn check(&self, values: &GroupValues) -> Option<ValidationErrors>;
}

/// Fails when a confirmation field is non-empty and differs from the
/// primary field. An empty confirmation passes so the error does not
/// show before the user has typed anything into it.
pub struct PasswordMatch {
    password: String,
    confirm: String,
}

impl PasswordMatch {
    pub fn new(password: impl Into<String>, confirm: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            confirm: confirm.into(),
        }
    }
}

impl ValidateGroup for PasswordMatch {
    fn key(&self) -> &str {
        keys::PASSWORD_MISMATCH
    }

    fn check(&self, values: &GroupValues) -> Option<ValidationErrors> {
        let password = values.text(&self.password).unwrap_or_default();
        let confirm = values.text(&self.confirm).unwrap_or_default();
        if confirm.is_empty() || confirm == password {
            return None;
        }
        Some(ValidationErrors::of(keys::PASSWORD_MISMATCH, json!(true)))
    }
}
