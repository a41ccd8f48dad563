//! Error types

use thiserror::Error;

/// Error type for structural operations on the control tree.
///
/// These are programming/shape errors (bad child name, bad index), not
/// validation failures. Validation failures are advisory state carried in
/// [`ValidationErrors`](crate::validate::ValidationErrors) and never
/// surface as `Err`.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    /// The requested child does not exist in the group or record.
    #[error("no child named '{name}'")]
    UnknownChild { name: String },

    /// An array position is past the end of the collection.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The child exists but is a different kind of control than requested.
    #[error("child '{name}' is a {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A pattern rule was built from an invalid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl FormError {
    /// Creates a new unknown-child error.
    pub fn unknown_child(name: impl Into<String>) -> Self {
        Self::UnknownChild { name: name.into() }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}

/// Error type for external lookup failures.
///
/// Produced by [`SkillSource`](crate::sources::SkillSource) and
/// [`UniquenessProbe`](crate::sources::UniquenessProbe) implementations
/// when the underlying call itself fails. How a failed lookup affects a
/// field is decided by its
/// [`LookupFailurePolicy`](crate::validate::LookupFailurePolicy).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LookupError {
    /// Error message.
    pub message: String,
}

impl LookupError {
    /// Create a new lookup error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for LookupError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LookupError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
