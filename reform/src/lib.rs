pub mod conditional;
pub mod control;
pub mod error;
pub mod events;
pub mod form;
pub mod sources;
pub mod validate;
pub mod value;

mod engine;

pub mod prelude {
    pub use crate::conditional::require_when;
    pub use crate::control::{
        ArrayControl, Control, ControlStatus, FieldControl, GroupControl, RecordControl, UpdateOn,
    };
    pub use crate::error::{FormError, LookupError};
    pub use crate::events::{ChangeEvent, Subscription};
    pub use crate::form::Form;
    pub use crate::sources::{SkillSource, UniquenessProbe};
    pub use crate::validate::{
        BanWords, Email, GroupValues, LookupFailurePolicy, MaxLength, MinLength, PasswordMatch,
        Pattern, Required, Unique, Validate, ValidateAsync, ValidateGroup, ValidationErrors, keys,
    };
    pub use crate::value::Value;
}
