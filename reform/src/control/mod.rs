//! Reactive control tree.
//!
//! A form is a tree of controls: [`FieldControl`] leaves under
//! [`GroupControl`] (named children), [`ArrayControl`] (ordered children)
//! and [`RecordControl`] (keyed children added and removed at runtime).
//!
//! Control handles are cheap to clone and refer to shared state, so a
//! handle kept by a subscription handler or a lookup task reaches the
//! same control as the one inside the tree. Aggregate value and status
//! are derived from the children on demand, never stored at the parent;
//! removing a dynamic child therefore removes its errors with it.

mod array;
mod field;
mod group;
mod record;

pub use array::ArrayControl;
pub use field::{FieldBuilder, FieldControl};
pub use group::{GroupBuilder, GroupControl};
pub use record::RecordControl;

use crate::events::Wakeup;
use crate::validate::ValidationErrors;
use crate::value::Value;

/// Validation status of a control.
///
/// For parents this is the aggregate over the subtree: pending wins over
/// invalid, invalid over valid, and disabled children are exempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStatus {
    /// All active rules pass.
    Valid,
    /// At least one rule failed.
    Invalid,
    /// An asynchronous rule has not resolved yet.
    Pending,
    /// Exempt from validation.
    Disabled,
}

impl ControlStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ControlStatus::Valid)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ControlStatus::Pending)
    }
}

/// When a field runs its synchronous rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOn {
    /// On every value edit.
    #[default]
    Change,
    /// Only on [`commit`](FieldControl::commit) (loss of focus).
    Blur,
}

/// Any control in the tree.
#[derive(Clone)]
pub enum Control {
    Field(FieldControl),
    Group(GroupControl),
    Array(ArrayControl),
    Record(RecordControl),
}

impl Control {
    /// Control kind name, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Control::Field(_) => "field",
            Control::Group(_) => "group",
            Control::Array(_) => "array",
            Control::Record(_) => "record",
        }
    }

    /// Snapshot of the subtree's current value.
    pub fn value(&self) -> Value {
        match self {
            Control::Field(c) => c.value(),
            Control::Group(c) => c.value(),
            Control::Array(c) => c.value(),
            Control::Record(c) => c.value(),
        }
    }

    /// Derived status of the subtree.
    pub fn status(&self) -> ControlStatus {
        match self {
            Control::Field(c) => c.status(),
            Control::Group(c) => c.status(),
            Control::Array(c) => c.status(),
            Control::Record(c) => c.status(),
        }
    }

    pub fn as_field(&self) -> Option<&FieldControl> {
        match self {
            Control::Field(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupControl> {
        match self {
            Control::Group(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayControl> {
        match self {
            Control::Array(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordControl> {
        match self {
            Control::Record(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn attach_wakeup(&self, wakeup: &Wakeup) {
        match self {
            Control::Field(c) => c.attach_wakeup(wakeup),
            Control::Group(c) => c.attach_wakeup(wakeup),
            Control::Array(c) => c.attach_wakeup(wakeup),
            Control::Record(c) => c.attach_wakeup(wakeup),
        }
    }
}

impl From<FieldControl> for Control {
    fn from(c: FieldControl) -> Self {
        Control::Field(c)
    }
}

impl From<GroupControl> for Control {
    fn from(c: GroupControl) -> Self {
        Control::Group(c)
    }
}

impl From<ArrayControl> for Control {
    fn from(c: ArrayControl) -> Self {
        Control::Array(c)
    }
}

impl From<RecordControl> for Control {
    fn from(c: RecordControl) -> Self {
        Control::Record(c)
    }
}

/// Aggregate child statuses: pending anywhere makes the parent pending,
/// otherwise any invalid makes it invalid. Disabled children are skipped.
pub(crate) fn aggregate<I>(statuses: I) -> ControlStatus
where
    I: IntoIterator<Item = ControlStatus>,
{
    let mut result = ControlStatus::Valid;
    for status in statuses {
        match status {
            ControlStatus::Pending => return ControlStatus::Pending,
            ControlStatus::Invalid => result = ControlStatus::Invalid,
            ControlStatus::Valid | ControlStatus::Disabled => {}
        }
    }
    result
}

/// Aggregate that also folds in parent-level errors (group rules).
pub(crate) fn aggregate_with_errors<I>(statuses: I, own_errors: &ValidationErrors) -> ControlStatus
where
    I: IntoIterator<Item = ControlStatus>,
{
    match aggregate(statuses) {
        ControlStatus::Valid if !own_errors.is_empty() => ControlStatus::Invalid,
        status => status,
    }
}
