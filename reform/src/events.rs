//! Change notification for controls.
//!
//! Controls push value and status changes to subscribed handlers.
//! Delivery is synchronous, after the validator pipeline for the
//! triggering edit has completed (or from the lookup task, for async
//! completions). A [`Subscription`] must be released (explicitly via
//! [`Subscription::unsubscribe`] or by dropping it) to avoid leaking
//! handlers past the owner's lifetime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::control::ControlStatus;
use crate::value::Value;

/// A change pushed to subscribers of a control or form.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// The value changed; carries the new value.
    Value(Value),
    /// The validation status changed.
    Status {
        previous: ControlStatus,
        current: ControlStatus,
    },
}

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

static NEXT_SUBSCRIPTION_ID: AtomicUsize = AtomicUsize::new(0);

/// Shared handler registry. Clones refer to the same registry.
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
    handlers: Arc<RwLock<Vec<(usize, Handler)>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(
        &self,
        handler: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::SeqCst);
        write_guard(&self.handlers).push((id, Arc::new(handler)));
        let registry: Weak<RwLock<Vec<(usize, Handler)>>> = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                write_guard(&registry).retain(|(entry, _)| *entry != id);
            }
        })
    }

    pub(crate) fn notify(&self, event: &ChangeEvent) {
        // Snapshot the handler list so callbacks can subscribe/unsubscribe
        // without deadlocking on the registry lock.
        let handlers: Vec<Handler> = read_guard(&self.handlers)
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        read_guard(&self.handlers).len()
    }
}

/// Handle for an active change subscription.
///
/// Dropping the handle releases the handler; [`unsubscribe`](Self::unsubscribe)
/// does the same explicitly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Release the handler.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

type WakeupHandler = Arc<dyn Fn() + Send + Sync>;

/// Form-wide change signal.
///
/// Every control attached to a form shares one `Wakeup`; any mutation
/// pings it so the form can recompute its aggregate value and status.
/// A detached control carries its own silent instance.
#[derive(Clone, Default)]
pub(crate) struct Wakeup {
    handlers: Arc<RwLock<Vec<(usize, WakeupHandler)>>>,
}

impl Wakeup {
    pub(crate) fn watch(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::SeqCst);
        write_guard(&self.handlers).push((id, Arc::new(handler)));
        let registry = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                write_guard(&registry).retain(|(entry, _)| *entry != id);
            }
        })
    }

    pub(crate) fn notify(&self) {
        let handlers: Vec<WakeupHandler> = read_guard(&self.handlers)
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler();
        }
    }
}

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribe_removes_handler() {
        let subs = Subscribers::default();
        let sub = subs.subscribe(|_| {});
        assert_eq!(subs.len(), 1);
        sub.unsubscribe();
        assert_eq!(subs.len(), 0);
    }

    #[test]
    fn test_drop_removes_handler() {
        let subs = Subscribers::default();
        {
            let _sub = subs.subscribe(|_| {});
            assert_eq!(subs.len(), 1);
        }
        assert_eq!(subs.len(), 0);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_delivery() {
        let subs = Subscribers::default();
        let slot: Arc<RwLock<Option<Subscription>>> = Arc::new(RwLock::new(None));
        let sub = subs.subscribe({
            let slot = Arc::clone(&slot);
            move |_| {
                // Dropping our own subscription mid-delivery must not
                // deadlock on the registry lock.
                write_guard(&slot).take();
            }
        });
        *write_guard(&slot) = Some(sub);
        subs.notify(&ChangeEvent::Value(Value::Null));
        assert_eq!(subs.len(), 0);
    }
}
