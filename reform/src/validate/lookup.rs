//! Asynchronous rules backed by an external lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::LookupError;
use crate::sources::UniquenessProbe;
use crate::value::Value;

use super::errors::{ValidationErrors, keys};

/// An asynchronous rule over a single field value.
///
/// Async rules run only after the field's synchronous rules pass, and
/// only on commit (the blur/quiescence trigger), never per keystroke.
/// While a lookup is outstanding the field is pending; a value edit
/// supersedes any in-flight lookup, whose late result is discarded.
#[async_trait]
pub trait ValidateAsync: Send + Sync {
    /// Stable identity of this rule.
    fn key(&self) -> &str;

    /// `Ok(None)` when the value passes, `Ok(Some(_))` when it fails,
    /// `Err` when the lookup itself failed.
    async fn check(&self, value: Value) -> Result<Option<ValidationErrors>, LookupError>;
}

/// How a field treats a lookup that failed at the transport level.
///
/// The failure of the call is a different thing from "the value is
/// taken"; which of the two the user should see is the caller's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupFailurePolicy {
    /// Swallow the failure and leave the field valid (logged as a warning).
    #[default]
    TreatAsValid,
    /// Surface the failure under the `lookup_failed` error key.
    Report,
}

/// Fails with `not_unique` when the identifier is already registered
/// according to the probe.
pub struct Unique<P> {
    probe: Arc<P>,
}

impl<P: UniquenessProbe> Unique<P> {
    pub fn new(probe: Arc<P>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl<P: UniquenessProbe> ValidateAsync for Unique<P> {
    fn key(&self) -> &str {
        keys::NOT_UNIQUE
    }

    async fn check(&self, value: Value) -> Result<Option<ValidationErrors>, LookupError> {
        let Some(id) = value.as_str() else {
            return Ok(None);
        };
        if id.is_empty() {
            return Ok(None);
        }
        let taken = self.probe.is_taken(id).await?;
        Ok(taken.then(|| ValidationErrors::of(keys::NOT_UNIQUE, json!({ "id": id }))))
    }
}
