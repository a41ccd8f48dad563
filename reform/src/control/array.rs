//! Ordered, runtime-mutable collection of child controls.

use std::sync::{Arc, RwLock};

use crate::error::FormError;
use crate::events::{Wakeup, read_guard, write_guard};
use crate::value::Value;

use super::{Control, ControlStatus};

struct ArrayInner {
    children: Vec<Control>,
    wakeup: Wakeup,
}

/// An ordered sequence of controls. Entries are inserted and removed at
/// runtime without rebuilding the surrounding tree; a removed entry takes
/// its errors with it.
#[derive(Clone)]
pub struct ArrayControl {
    inner: Arc<RwLock<ArrayInner>>,
}

impl ArrayControl {
    pub fn new(children: Vec<Control>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ArrayInner {
                children,
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

    /// The entry at `index`, if present.
    pub fn at(&self, index: usize) -> Option<Control> {
        read_guard(&self.inner).children.get(index).cloned()
    }

    /// Insert an entry, shifting later entries up. An index past the end
    /// appends.
    pub fn insert(&self, index: usize, control: impl Into<Control>) {
        let control = control.into();
        let wakeup = {
            let mut inner = write_guard(&self.inner);
            let index = index.min(inner.children.len());
            control.attach_wakeup(&inner.wakeup);
            inner.children.insert(index, control);
            inner.wakeup.clone()
        };
        wakeup.notify();
    }

    /// Append an entry.
    pub fn push(&self, control: impl Into<Control>) {
        let index = self.len();
        self.insert(index, control);
    }

    /// Remove and return the entry at `index`, shifting later entries
    /// down.
    pub fn remove_at(&self, index: usize) -> Result<Control, FormError> {
        let (removed, wakeup) = {
            let mut inner = write_guard(&self.inner);
            if index >= inner.children.len() {
                return Err(FormError::IndexOutOfBounds {
                    index,
                    len: inner.children.len(),
                });
            }
            (inner.children.remove(index), inner.wakeup.clone())
        };
        wakeup.notify();
        Ok(removed)
    }

    /// Snapshot of all entries' values as a list.
    pub fn value(&self) -> Value {
        Value::List(
            read_guard(&self.inner)
                .children
                .iter()
                .map(Control::value)
                .collect(),
        )
    }

    /// Aggregate status over the entries.
    pub fn status(&self) -> ControlStatus {
        let statuses: Vec<ControlStatus> = read_guard(&self.inner)
            .children
            .iter()
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
        for child in &inner.children {
            child.attach_wakeup(wakeup);
        }
    }
}

impl Default for ArrayControl {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
