//! Error types for sql-template

use crate::arg::ArgKind;
use thiserror::Error;

/// Boxed error returned by fallible deferred values.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for sql-template operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for fragment construction and rendering
#[derive(Debug, Error)]
pub enum SqlError {
    /// A constructor, `join_by` or `set_name` received the wrong kind of value
    #[error("{what} should be {expected}, received: {value} with type {kind}")]
    InvalidArgument {
        what: &'static str,
        expected: &'static str,
        value: String,
        kind: ArgKind,
    },

    /// A deferred value failed while a fragment was being rendered.
    ///
    /// The callback's error is carried as-is; `Display` and `source()` are
    /// forwarded, and [`SqlError::into_resolve_error`] hands the callback's error back.
    #[error(transparent)]
    Resolve(BoxError),
}

impl SqlError {
    /// Create an invalid argument error
    pub fn invalid_argument(
        what: &'static str,
        expected: &'static str,
        value: impl Into<String>,
        kind: ArgKind,
    ) -> Self {
        Self::InvalidArgument {
            what,
            expected,
            value: value.into(),
            kind,
        }
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Check if this error came out of a deferred value
    pub fn is_resolve(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }

    /// Take back the error raised by a deferred value, if that is what this is.
    pub fn into_resolve_error(self) -> Option<BoxError> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::InvalidArgument { .. } => None,
        }
    }
}
