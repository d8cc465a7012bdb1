//! Error types for the minty library.
//!
//! Inside the crate errors are plain `anyhow` errors (`Res<T>`). At the command boundary they are
//! converted into the public `Error`, which carries an `ErrorType` so that a caller can tell a
//! rejected form apart from a workbook that could not be opened or saved.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an `Error`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The submitted form was rejected. Nothing was written.
    Validation,
    /// The workbook, or one of its sheets, is missing, unreadable or locked by another session.
    FileAccess,
    /// The workbook could not be saved.
    Write,
    /// The home directory or configuration file is missing or malformed.
    Config,
    /// Everything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// The error type returned by the public functions of this library.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into the public `Result` type.
pub(crate) trait IntoResult<T> {
    /// If the error already is (or wraps) a public `Error`, its type is kept. Otherwise the error
    /// is classified as `error_type`.
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: anyhow::Error = e.into();
            match e.downcast::<Error>() {
                Ok(typed) => typed,
                Err(e) => Error::new(error_type, e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_classifies_plain_errors() {
        let r: Res<()> = Err(anyhow::anyhow!("disk full"));
        let e = r.pub_result(ErrorType::Write).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Write);
        assert_eq!(e.to_string(), "disk full");
    }

    #[test]
    fn test_pub_result_keeps_inner_type() {
        let inner = Error::new(ErrorType::FileAccess, anyhow::anyhow!("no sheet named 'Tx'"));
        let r: Res<()> = Err::<(), Error>(inner).context("while appending");
        let e = r.pub_result(ErrorType::Write).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::FileAccess);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::FileAccess.to_string(), "file_access");
    }
}
