//! Leaf control holding a single value.

use std::sync::{Arc, RwLock};

use crate::engine::{self, LookupJob};
use crate::events::{ChangeEvent, Subscribers, Subscription, Wakeup, read_guard, write_guard};
use crate::validate::{LookupFailurePolicy, Validate, ValidateAsync, ValidationErrors};
use crate::value::Value;

use super::{ControlStatus, UpdateOn};

struct FieldInner {
    value: Value,
    validators: Vec<Box<dyn Validate>>,
    async_validators: Vec<Arc<dyn ValidateAsync>>,
    update_on: UpdateOn,
    lookup_policy: LookupFailurePolicy,
    /// Failures from the synchronous rule set.
    sync_errors: ValidationErrors,
    /// Failures from the last applied lookup; cleared on every edit.
    async_errors: ValidationErrors,
    /// Generation of the lookup currently outstanding, if any.
    pending: Option<u64>,
    /// Bumped on every edit; stale lookup results are discarded against it.
    generation: u64,
    dirty: bool,
    touched: bool,
    disabled: bool,
    wakeup: Wakeup,
}

impl FieldInner {
    fn run_sync(&mut self) {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            if let Some(failure) = validator.check(&self.value) {
                errors.merge(failure);
            }
        }
        self.sync_errors = errors;
    }

    fn current_status(&self) -> ControlStatus {
        if self.disabled {
            ControlStatus::Disabled
        } else if self.pending.is_some() {
            ControlStatus::Pending
        } else if !self.sync_errors.is_empty() || !self.async_errors.is_empty() {
            ControlStatus::Invalid
        } else {
            ControlStatus::Valid
        }
    }

    fn merged_errors(&self) -> ValidationErrors {
        let mut errors = self.sync_errors.clone();
        errors.merge(self.async_errors.clone());
        errors
    }
}

/// A single named value slot with an ordered, runtime-reconfigurable set
/// of validation rules.
///
/// Handles are cheap clones of the same underlying field.
///
/// # Example
///
/// ```
/// use reform::control::FieldControl;
///
/// let name = FieldControl::builder("").required().max_length(25).build();
/// assert!(!name.is_valid());
///
/// name.set_value("Manohar");
/// assert!(name.is_valid());
/// ```
#[derive(Clone)]
pub struct FieldControl {
    inner: Arc<RwLock<FieldInner>>,
    value_subs: Subscribers,
    status_subs: Subscribers,
}

impl FieldControl {
    /// Start building a field with an initial value.
    pub fn builder(initial: impl Into<Value>) -> FieldBuilder {
        FieldBuilder::new(initial.into())
    }

    /// A field with no validation rules.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::builder(initial).build()
    }

    /// Snapshot of the current value.
    pub fn value(&self) -> Value {
        read_guard(&self.inner).value.clone()
    }

    /// Set a new value.
    ///
    /// Bumps the edit generation, superseding any outstanding lookup.
    /// Synchronous rules re-run immediately for [`UpdateOn::Change`]
    /// fields; [`UpdateOn::Blur`] fields keep their errors until the next
    /// [`commit`](Self::commit).
    pub fn set_value(&self, value: impl Into<Value>) {
        let value = value.into();
        let (events, wakeup) = {
            let mut inner = write_guard(&self.inner);
            let previous = inner.current_status();
            inner.value = value.clone();
            inner.dirty = true;
            inner.generation += 1;
            inner.pending = None;
            inner.async_errors.clear();
            if inner.update_on == UpdateOn::Change {
                inner.run_sync();
            }
            let current = inner.current_status();
            let mut events = vec![ChangeEvent::Value(value)];
            if previous != current {
                events.push(ChangeEvent::Status { previous, current });
            }
            (events, inner.wakeup.clone())
        };
        self.dispatch(events, &wakeup);
    }

    /// Commit the value: the blur/quiescence trigger.
    ///
    /// Re-runs the synchronous rules, and when they pass, starts the
    /// field's asynchronous rules. While the lookup is outstanding the
    /// field is pending; exactly one lookup is outstanding at a time and
    /// a later edit supersedes it.
    ///
    /// Fields with asynchronous rules require an ambient Tokio runtime.
    pub fn commit(&self) {
        let mut job = None;
        let (events, wakeup) = {
            let mut inner = write_guard(&self.inner);
            let previous = inner.current_status();
            inner.touched = true;
            inner.run_sync();
            inner.pending = None;
            inner.async_errors.clear();
            if !inner.disabled
                && inner.sync_errors.is_empty()
                && !inner.async_validators.is_empty()
            {
                inner.pending = Some(inner.generation);
                job = Some(LookupJob {
                    field: self.clone(),
                    generation: inner.generation,
                    value: inner.value.clone(),
                    validators: inner.async_validators.clone(),
                    policy: inner.lookup_policy,
                });
            }
            let current = inner.current_status();
            let events = (previous != current)
                .then_some(ChangeEvent::Status { previous, current })
                .into_iter()
                .collect();
            (events, inner.wakeup.clone())
        };
        self.dispatch(events, &wakeup);
        if let Some(job) = job {
            engine::spawn(job);
        }
    }

    /// Re-run the synchronous rules against the current value.
    ///
    /// Call after reconfiguring the rule set. Errors from an already
    /// applied lookup are kept; the value has not changed.
    pub fn revalidate(&self) {
        let (events, wakeup) = {
            let mut inner = write_guard(&self.inner);
            let previous = inner.current_status();
            inner.run_sync();
            let current = inner.current_status();
            let events = (previous != current)
                .then_some(ChangeEvent::Status { previous, current })
                .into_iter()
                .collect();
            (events, inner.wakeup.clone())
        };
        self.dispatch(events, &wakeup);
    }

    /// Current failure set, merged across synchronous and lookup rules.
    /// Empty while disabled.
    pub fn errors(&self) -> ValidationErrors {
        let inner = read_guard(&self.inner);
        if inner.disabled {
            ValidationErrors::new()
        } else {
            inner.merged_errors()
        }
    }

    pub fn status(&self) -> ControlStatus {
        read_guard(&self.inner).current_status()
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    pub fn is_dirty(&self) -> bool {
        read_guard(&self.inner).dirty
    }

    /// Mark the field dirty without changing its value.
    pub fn mark_dirty(&self) {
        write_guard(&self.inner).dirty = true;
    }

    pub fn is_touched(&self) -> bool {
        read_guard(&self.inner).touched
    }

    pub fn is_disabled(&self) -> bool {
        read_guard(&self.inner).disabled
    }

    /// Enable or disable the field. A disabled field reports no errors
    /// and is exempt from aggregate status.
    pub fn set_disabled(&self, disabled: bool) {
        let (events, wakeup) = {
            let mut inner = write_guard(&self.inner);
            let previous = inner.current_status();
            inner.disabled = disabled;
            if disabled {
                inner.pending = None;
            }
            let current = inner.current_status();
            let events = (previous != current)
                .then_some(ChangeEvent::Status { previous, current })
                .into_iter()
                .collect();
            (events, inner.wakeup.clone())
        };
        self.dispatch(events, &wakeup);
    }

    // =========================================================================
    // Rule set reconfiguration
    // =========================================================================

    /// Append a rule to the active set. Takes effect on the next
    /// validation pass; call [`revalidate`](Self::revalidate) to apply
    /// immediately.
    pub fn add_validator(&self, validator: impl Validate + 'static) {
        let mut inner = write_guard(&self.inner);
        log::debug!("adding rule '{}' to field", validator.key());
        inner.validators.push(Box::new(validator));
    }

    /// Remove every rule with the given key. Returns whether any was
    /// removed.
    pub fn remove_validator(&self, key: &str) -> bool {
        let mut inner = write_guard(&self.inner);
        let before = inner.validators.len();
        inner.validators.retain(|v| v.key() != key);
        let removed = inner.validators.len() != before;
        if removed {
            log::debug!("removed rule '{key}' from field");
        }
        removed
    }

    /// Whether the active set holds a rule with the given key.
    pub fn has_validator(&self, key: &str) -> bool {
        read_guard(&self.inner).validators.iter().any(|v| v.key() == key)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribe to value changes. The handler receives
    /// [`ChangeEvent::Value`] after the validation pipeline for the edit
    /// has completed.
    pub fn value_changes(
        &self,
        handler: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.value_subs.subscribe(handler)
    }

    /// Subscribe to status transitions.
    pub fn status_changes(
        &self,
        handler: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.status_subs.subscribe(handler)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    pub(crate) fn attach_wakeup(&self, wakeup: &Wakeup) {
        write_guard(&self.inner).wakeup = wakeup.clone();
    }

    /// Apply the outcome of a finished lookup. Discarded when the edit
    /// generation moved on while the lookup was in flight.
    pub(crate) fn apply_lookup_result(&self, generation: u64, errors: ValidationErrors) {
        let (events, wakeup) = {
            let mut inner = write_guard(&self.inner);
            if inner.pending != Some(generation) || inner.generation != generation {
                log::debug!("discarding stale lookup result (generation {generation})");
                return;
            }
            let previous = inner.current_status();
            inner.pending = None;
            inner.async_errors = errors;
            let current = inner.current_status();
            let events: Vec<ChangeEvent> = (previous != current)
                .then_some(ChangeEvent::Status { previous, current })
                .into_iter()
                .collect();
            (events, inner.wakeup.clone())
        };
        self.dispatch(events, &wakeup);
    }

    fn dispatch(&self, events: Vec<ChangeEvent>, wakeup: &Wakeup) {
        for event in &events {
            match event {
                ChangeEvent::Value(_) => self.value_subs.notify(event),
                ChangeEvent::Status { .. } => self.status_subs.notify(event),
            }
        }
        wakeup.notify();
    }
}

/// Builder for [`FieldControl`].
///
/// Rule shortcuts mirror the built-in rules; [`validator`](Self::validator)
/// accepts any custom [`Validate`] implementation.
pub struct FieldBuilder {
    value: Value,
    validators: Vec<Box<dyn Validate>>,
    async_validators: Vec<Arc<dyn ValidateAsync>>,
    update_on: UpdateOn,
    lookup_policy: LookupFailurePolicy,
    disabled: bool,
}

impl FieldBuilder {
    fn new(value: Value) -> Self {
        Self {
            value,
            validators: Vec::new(),
            async_validators: Vec::new(),
            update_on: UpdateOn::default(),
            lookup_policy: LookupFailurePolicy::default(),
            disabled: false,
        }
    }

    /// Add a custom synchronous rule.
    pub fn validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Require the field to be non-null and non-blank.
    pub fn required(self) -> Self {
        self.validator(crate::validate::Required)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize) -> Self {
        self.validator(crate::validate::MinLength::new(min))
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize) -> Self {
        self.validator(crate::validate::MaxLength::new(max))
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(self, pattern: &str) -> Self {
        let rule = crate::validate::Pattern::new(pattern).expect("invalid regex pattern");
        self.validator(rule)
    }

    /// Require a valid email address.
    pub fn email(self) -> Self {
        self.validator(crate::validate::Email)
    }

    /// Reject a set of banned words (case-insensitive exact match).
    pub fn ban_words<I>(self, words: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.validator(crate::validate::BanWords::new(words))
    }

    /// Add an asynchronous rule, run on commit.
    pub fn async_validator(mut self, validator: impl ValidateAsync + 'static) -> Self {
        self.async_validators.push(Arc::new(validator));
        self
    }

    /// When the synchronous rules run (default: on every change).
    pub fn update_on(mut self, update_on: UpdateOn) -> Self {
        self.update_on = update_on;
        self
    }

    /// How a transport-level lookup failure surfaces (default: treated
    /// as valid).
    pub fn on_lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Start disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Build the field. The synchronous rules run once against the
    /// initial value so status reflects it from the start.
    pub fn build(self) -> FieldControl {
        let mut inner = FieldInner {
            value: self.value,
            validators: self.validators,
            async_validators: self.async_validators,
            update_on: self.update_on,
            lookup_policy: self.lookup_policy,
            sync_errors: ValidationErrors::new(),
            async_errors: ValidationErrors::new(),
            pending: None,
            generation: 0,
            dirty: false,
            touched: false,
            disabled: self.disabled,
            wakeup: Wakeup::default(),
        };
        inner.run_sync();
        FieldControl {
            inner: Arc::new(RwLock::new(inner)),
            value_subs: Subscribers::default(),
            status_subs: Subscribers::default(),
        }
    }
}
