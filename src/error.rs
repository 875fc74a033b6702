//! Error types for the public interface of the crate.
//!
//! Internally, functions return `Res<T>`, which is an `anyhow::Result`. At the public boundary
//! errors are classified with an `ErrorType` so that a presentation layer can decide how to show
//! them (a full-page failure for `DataUnavailable`, inline field messages for `InvalidInput`).

use crate::mutate::FieldErrors;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The initial fetch of financial data failed. Not recoverable within a session.
    DataUnavailable,
    /// Submitted data failed validation. Nothing was changed.
    InvalidInput,
    /// The configuration file could not be read or is invalid.
    Config,
    /// Rendering, serialization or some other unexpected failure.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It wraps an `anyhow::Error` and records which `ErrorType` it is.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// When the error was caused by validation, returns the per-field messages.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.inner.downcast_ref::<FieldErrors>()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into the public `Result` by tagging it with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error_type() {
        let res: Res<()> = Err(anyhow!("boom"));
        let err = res.pub_result(ErrorType::DataUnavailable).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::DataUnavailable);
        assert_eq!(err.to_string(), "data_unavailable: boom");
    }

    #[test]
    fn test_no_field_errors_for_other_errors() {
        let err = Error::new(ErrorType::Internal, anyhow!("nope"));
        assert!(err.field_errors().is_none());
    }
}
