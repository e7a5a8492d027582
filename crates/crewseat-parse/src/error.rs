//! Error types for the extraction layer.
//!
//! [`BackendError`] wraps backend-specific failures and converts into
//! [`RosterError`] so callers deal with one error type.

use crewseat_core::RosterError;
use thiserror::Error;

/// Error type for PDF extraction backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] RosterError),
}

impl From<BackendError> for RosterError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => RosterError::ParseError(msg),
            BackendError::Io(e) => RosterError::IoError(e.to_string()),
            BackendError::Font(msg) => RosterError::FontError(msg),
            BackendError::Interpreter(msg) => RosterError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn converts_into_roster_error() {
        let err: RosterError = BackendError::Interpreter("stack underflow".to_string()).into();
        assert_eq!(
            err,
            RosterError::InterpreterError("stack underflow".to_string())
        );
        let err: RosterError = BackendError::Font("no widths".to_string()).into();
        assert_eq!(err, RosterError::FontError("no widths".to_string()));
    }

    #[test]
    fn core_error_passes_through() {
        let err: RosterError = BackendError::Core(RosterError::PasswordRequired).into();
        assert_eq!(err, RosterError::PasswordRequired);
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BackendError::Parse("x".to_string()));
        assert!(err.to_string().contains('x'));
    }
}
