//! Form root wrapping a group control.

use std::sync::{Arc, RwLock};

use crate::control::{ControlStatus, GroupControl};
use crate::events::{ChangeEvent, Subscribers, Subscription, Wakeup, write_guard};
use crate::value::Value;

/// The root of a form: a group control plus form-wide change delivery.
///
/// Every control in the tree (including entries added to arrays and
/// records later) shares the form's change signal; any edit or lookup
/// completion re-derives the aggregate value and status and pushes them
/// to the form's subscribers. Status handlers receive the previous
/// status alongside the current one, so "left pending" is a plain match
/// on the event.
///
/// Dropping the form releases its internal watcher; subscriptions handed
/// out by [`value_changes`](Self::value_changes) and
/// [`status_changes`](Self::status_changes) are released by their own
/// guards.
pub struct Form {
    root: GroupControl,
    value_subs: Subscribers,
    status_subs: Subscribers,
    _watcher: Subscription,
}

impl Form {
    pub fn new(root: GroupControl) -> Self {
        let wakeup = Wakeup::default();
        root.attach_wakeup(&wakeup);

        let value_subs = Subscribers::default();
        let status_subs = Subscribers::default();
        let last_status = Arc::new(RwLock::new(root.status()));

        let watcher = {
            let root = root.clone();
            let value_subs = value_subs.clone();
            let status_subs = status_subs.clone();
            let last_status = Arc::clone(&last_status);
            wakeup.watch(move || {
                value_subs.notify(&ChangeEvent::Value(root.value()));
                let current = root.status();
                let previous = {
                    let mut last = write_guard(&last_status);
                    std::mem::replace(&mut *last, current)
                };
                if previous != current {
                    log::trace!("form status {previous:?} -> {current:?}");
                    status_subs.notify(&ChangeEvent::Status { previous, current });
                }
            })
        };

        Self {
            root,
            value_subs,
            status_subs,
            _watcher: watcher,
        }
    }

    /// The root group.
    pub fn root(&self) -> &GroupControl {
        &self.root
    }

    /// Snapshot of the whole form's value.
    pub fn value(&self) -> Value {
        self.root.value()
    }

    /// Derived status of the whole form.
    pub fn status(&self) -> ControlStatus {
        self.root.status()
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    /// Subscribe to form value changes ([`ChangeEvent::Value`] with the
    /// full form snapshot, after every change anywhere in the tree).
    pub fn value_changes(
        &self,
        handler: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.value_subs.subscribe(handler)
    }

    /// Subscribe to form status transitions.
    pub fn status_changes(
        &self,
        handler: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.status_subs.subscribe(handler)
    }
}
