//! Keyed, runtime-mutable collection of child controls.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::FormError;
use crate::events::{Wakeup, read_guard, write_guard};
use crate::value::Value;

use super::{Control, ControlStatus, FieldControl};

struct RecordInner {
    children: BTreeMap<String, Control>,
    wakeup: Wakeup,
}

/// A set of controls keyed by externally supplied names, added and
/// removed at runtime (e.g. one boolean flag per skill name).
#[derive(Clone)]
pub struct RecordControl {
    inner: Arc<RwLock<RecordInner>>,
}

impl RecordControl {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RecordInner {
                children: BTreeMap::new(),
                wakeup: Wakeup::default(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        read_guard(&self.inner).children.len()
    }

    pub fn is_empty(&self) -> bool {
        read_guard(&self.inner).children.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        read_guard(&self.inner).children.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        read_guard(&self.inner).children.keys().cloned().collect()
    }

    /// The entry for `key`, if present.
    pub fn get(&self, key: &str) -> Option<Control> {
        read_guard(&self.inner).children.get(key).cloned()
    }

    /// The entry for `key` as a field.
    pub fn field(&self, key: &str) -> Result<FieldControl, FormError> {
        let child = self
            .get(key)
            .ok_or_else(|| FormError::unknown_child(key))?;
        child
            .as_field()
            .cloned()
            .ok_or_else(|| FormError::type_mismatch(key, "field", child.kind()))
    }

    /// Add an entry, replacing any existing one under the same key.
    pub fn add_entry(&self, key: impl Into<String>, control: impl Into<Control>) {
        let control = control.into();
        let wakeup = {
            let mut inner = write_guard(&self.inner);
            control.attach_wakeup(&inner.wakeup);
            inner.children.insert(key.into(), control);
            inner.wakeup.clone()
        };
        wakeup.notify();
    }

    /// Remove and return the entry under `key`.
    pub fn remove_entry(&self, key: &str) -> Result<Control, FormError> {
        let (removed, wakeup) = {
            let mut inner = write_guard(&self.inner);
            let removed = inner
                .children
                .remove(key)
                .ok_or_else(|| FormError::unknown_child(key))?;
            (removed, inner.wakeup.clone())
        };
        wakeup.notify();
        Ok(removed)
    }

    /// Snapshot of all entries' values as a map.
    pub fn value(&self) -> Value {
        Value::Map(
            read_guard(&self.inner)
                .children
                .iter()
                .map(|(key, control)| (key.clone(), control.value()))
                .collect(),
        )
    }

    /// Aggregate status over the entries.
    pub fn status(&self) -> ControlStatus {
        let statuses: Vec<ControlStatus> = read_guard(&self.inner)
            .children
            .values()
            .map(Control::status)
            .collect();
        super::aggregate(statuses)
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    pub(crate) fn attach_wakeup(&self, wakeup: &Wakeup) {
        let mut inner = write_guard(&self.inner);
        inner.wakeup = wakeup.clone();
        for child in inner.children.values() {
            child.attach_wakeup(wakeup);
        }
    }
}

impl Default for RecordControl {
    fn default() -> Self {
        Self::new()
    }
}
