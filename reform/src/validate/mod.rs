//! Validation rules for form controls.
//!
//! Three rule shapes cover the validation surface:
//!
//! - [`Validate`] — synchronous, per-field rules ([`Required`],
//!   [`MinLength`], [`MaxLength`], [`Pattern`], [`Email`], [`BanWords`]).
//! - [`ValidateGroup`] — cross-field rules scoped to a group
//!   ([`PasswordMatch`]).
//! - [`ValidateAsync`] — rules backed by an external lookup ([`Unique`]),
//!   run on commit with supersession of stale results.
//!
//! Every rule is identified by a stable key so a field's active rule set
//! can be reconfigured at runtime (see
//! [`FieldControl::remove_validator`](crate::control::FieldControl::remove_validator)).
//!
//! # Example
//!
//! ```
//! use reform::validate::{BanWords, Validate, keys};
//! use reform::value::Value;
//!
//! let rule = BanWords::new(["test", "dummy"]);
//! let errors = rule.check(&Value::from("Test")).unwrap();
//! assert!(errors.contains(keys::BANNED_WORD));
//! assert!(rule.check(&Value::from("testing")).is_none());
//! ```

mod errors;
mod group;
mod lookup;
mod rules;

pub use errors::{ValidationErrors, keys};
pub use group::{GroupValues, PasswordMatch, ValidateGroup};
pub use lookup::{LookupFailurePolicy, Unique, ValidateAsync};
pub use rules::{BanWords, Email, MaxLength, MinLength, Pattern, Required, Validate};
