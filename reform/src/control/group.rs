//! Named collection of child controls with group-level rules.

use std::sync::{Arc, RwLock};

use crate::error::FormError;
use crate::events::{Wakeup, read_guard, write_guard};
use crate::validate::{GroupValues, ValidateGroup, ValidationErrors};
use crate::value::Value;

use super::{ArrayControl, Control, ControlStatus, FieldControl, RecordControl};

struct GroupInner {
    /// Children in declaration order.
    children: Vec<(String, Control)>,
    validators: Vec<Box<dyn ValidateGroup>>,
    wakeup: Wakeup,
}

impl GroupInner {
    fn snapshot(&self) -> GroupValues {
        GroupValues::new(
            self.children
                .iter()
                .map(|(name, control)| (name.clone(), control.value()))
                .collect(),
        )
    }

    fn own_errors(&self) -> ValidationErrors {
        let values = self.snapshot();
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            if let Some(failure) = validator.check(&values) {
                errors.merge(failure);
            }
        }
        errors
    }
}

/// A named collection of controls, validated per child and as a whole.
///
/// Cross-field rules attached to the group report failures scoped to the
/// group itself, separate from any child's errors.
#[derive(Clone)]
pub struct GroupControl {
    inner: Arc<RwLock<GroupInner>>,
}

impl GroupControl {
    pub fn builder() -> GroupBuilder {
        GroupBuilder::default()
    }

    /// The named child.
    pub fn child(&self, name: &str) -> Result<Control, FormError> {
        read_guard(&self.inner)
            .children
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, control)| control.clone())
            .ok_or_else(|| FormError::unknown_child(name))
    }

    /// The named child as a field.
    pub fn field(&self, name: &str) -> Result<FieldControl, FormError> {
        let child = self.child(name)?;
        child
            .as_field()
            .cloned()
            .ok_or_else(|| FormError::type_mismatch(name, "field", child.kind()))
    }

    /// The named child as a group.
    pub fn group(&self, name: &str) -> Result<GroupControl, FormError> {
        let child = self.child(name)?;
        child
            .as_group()
            .cloned()
            .ok_or_else(|| FormError::type_mismatch(name, "group", child.kind()))
    }

    /// The named child as an array.
    pub fn array(&self, name: &str) -> Result<ArrayControl, FormError> {
        let child = self.child(name)?;
        child
            .as_array()
            .cloned()
            .ok_or_else(|| FormError::type_mismatch(name, "array", child.kind()))
    }

    /// The named child as a record.
    pub fn record(&self, name: &str) -> Result<RecordControl, FormError> {
        let child = self.child(name)?;
        child
            .as_record()
            .cloned()
            .ok_or_else(|| FormError::type_mismatch(name, "record", child.kind()))
    }

    /// Child names in declaration order.
    pub fn names(&self) -> Vec<String> {
        read_guard(&self.inner)
            .children
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Snapshot of all children's values as a map.
    pub fn value(&self) -> Value {
        let inner = read_guard(&self.inner);
        Value::Map(
            inner
                .children
                .iter()
                .map(|(name, control)| (name.clone(), control.value()))
                .collect(),
        )
    }

    /// Failures from the group-level rules, recomputed against the
    /// current children.
    pub fn errors(&self) -> ValidationErrors {
        read_guard(&self.inner).own_errors()
    }

    /// Aggregate status over the children plus the group-level rules.
    pub fn status(&self) -> ControlStatus {
        let inner = read_guard(&self.inner);
        let statuses: Vec<ControlStatus> = inner
            .children
            .iter()
            .map(|(_, control)| control.status())
            .collect();
        super::aggregate_with_errors(statuses, &inner.own_errors())
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    pub(crate) fn attach_wakeup(&self, wakeup: &Wakeup) {
        let mut inner = write_guard(&self.inner);
        inner.wakeup = wakeup.clone();
        for (_, child) in &inner.children {
            child.attach_wakeup(wakeup);
        }
    }
}

/// Builder for [`GroupControl`].
#[derive(Default)]
pub struct GroupBuilder {
    children: Vec<(String, Control)>,
    validators: Vec<Box<dyn ValidateGroup>>,
}

impl GroupBuilder {
    /// Add a named child.
    pub fn child(mut self, name: impl Into<String>, control: impl Into<Control>) -> Self {
        self.children.push((name.into(), control.into()));
        self
    }

    /// Add a group-level rule.
    pub fn validator(mut self, validator: impl ValidateGroup + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn build(self) -> GroupControl {
        GroupControl {
            inner: Arc::new(RwLock::new(GroupInner {
                children: self.children,
                validators: self.validators,
                wakeup: Wakeup::default(),
            })),
        }
    }
}
