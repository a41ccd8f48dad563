//! Conditional requiredness between sibling fields.

use crate::control::FieldControl;
use crate::events::{ChangeEvent, Subscription};
use crate::validate::{Required, keys};
use crate::value::Value;

/// Make `target` required whenever `predicate` holds for `driver`'s
/// value.
///
/// The predicate is evaluated against the driver's current value
/// immediately and then on every later change. Each evaluation toggles a
/// [`Required`] rule on the target, marks it dirty and revalidates it,
/// so the target's validity is never stale across the boundary.
///
/// Dropping the returned [`Subscription`] stops the rule.
pub fn require_when(
    driver: &FieldControl,
    target: &FieldControl,
    predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
) -> Subscription {
    let target = target.clone();
    let apply = move |value: &Value| {
        let required = predicate(value);
        let present = target.has_validator(keys::REQUIRED);
        if required && !present {
            target.add_validator(Required);
        } else if !required && present {
            target.remove_validator(keys::REQUIRED);
        }
        target.mark_dirty();
        target.revalidate();
    };

    apply(&driver.value());
    driver.value_changes(move |event| {
        if let ChangeEvent::Value(value) = event {
            apply(value);
        }
    })
}
