//! Tests for change subscriptions and form-level delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use reform::control::{ControlStatus, FieldControl, GroupControl};
use reform::events::ChangeEvent;
use reform::form::Form;
use reform::value::Value;

#[test]
fn test_value_changes_delivers_new_value() {
    let field = FieldControl::new("");
    let seen = Arc::new(Mutex::new(Vec::new()));

    let _sub = field.value_changes({
        let seen = Arc::clone(&seen);
        move |event| {
            if let ChangeEvent::Value(value) = event {
                seen.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(value.clone());
            }
        }
    });

    field.set_value("a");
    field.set_value("b");
    let seen = seen.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(*seen, vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn test_status_changes_carries_previous_status() {
    let field = FieldControl::builder("").required().build();
    let transitions = Arc::new(Mutex::new(Vec::new()));

    let _sub = field.status_changes({
        let transitions = Arc::clone(&transitions);
        move |event| {
            if let ChangeEvent::Status { previous, current } = event {
                transitions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((*previous, *current));
            }
        }
    });

    field.set_value("x");
    field.set_value("");
    let transitions = transitions.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(
        *transitions,
        vec![
            (ControlStatus::Invalid, ControlStatus::Valid),
            (ControlStatus::Valid, ControlStatus::Invalid),
        ]
    );
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let field = FieldControl::new("");
    let count = Arc::new(AtomicUsize::new(0));

    let sub = field.value_changes({
        let count = Arc::clone(&count);
        move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    });

    field.set_value("a");
    sub.unsubscribe();
    field.set_value("b");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_subscription_releases_handler() {
    let field = FieldControl::new("");
    let count = Arc::new(AtomicUsize::new(0));

    {
        let _sub = field.value_changes({
            let count = Arc::clone(&count);
            move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });
        field.set_value("a");
    }

    field.set_value("b");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_form_emits_value_and_status_for_nested_edits() {
    let form = Form::new(
        GroupControl::builder()
            .child("name", FieldControl::builder("").required().build())
            .build(),
    );
    assert_eq!(form.status(), ControlStatus::Invalid);

    let values = Arc::new(AtomicUsize::new(0));
    let _values_sub = form.value_changes({
        let values = Arc::clone(&values);
        move |_| {
            values.fetch_add(1, Ordering::SeqCst);
        }
    });

    let transitions = Arc::new(Mutex::new(Vec::new()));
    let _status_sub = form.status_changes({
        let transitions = Arc::clone(&transitions);
        move |event| {
            if let ChangeEvent::Status { previous, current } = event {
                transitions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((*previous, *current));
            }
        }
    });

    form.root().field("name").unwrap().set_value("Manohar");
    assert!(form.is_valid());
    assert!(values.load(Ordering::SeqCst) >= 1);
    assert_eq!(
        *transitions.lock().unwrap_or_else(PoisonError::into_inner),
        vec![(ControlStatus::Invalid, ControlStatus::Valid)]
    );
}

#[test]
fn test_controls_added_at_runtime_report_through_the_form() {
    let record = reform::control::RecordControl::new();
    let form = Form::new(
        GroupControl::builder()
            .child("skills", record.clone())
            .build(),
    );

    let values = Arc::new(AtomicUsize::new(0));
    let _sub = form.value_changes({
        let values = Arc::clone(&values);
        move |_| {
            values.fetch_add(1, Ordering::SeqCst);
        }
    });

    record.add_entry("Rust", FieldControl::new(false));
    record.field("Rust").unwrap().set_value(true);
    assert!(values.load(Ordering::SeqCst) >= 2);

    let value = form.value();
    let skills = value.as_map().unwrap()["skills"].as_map().unwrap().clone();
    assert_eq!(skills["Rust"], Value::from(true));
}
