//! Error and warning types for crewseat.
//!
//! Provides [`RosterError`] for fatal errors that stop a parse,
//! [`ParseWarning`] for per-line or per-page issues that only exclude that
//! part's contribution, and [`ParseResult`] for pairing a value with
//! collected warnings.

use std::fmt;

/// Fatal error types for roster processing.
///
/// These errors indicate conditions that prevent a parse from producing
/// any output. Pattern mismatches on single lines are never errors; they
/// surface as [`ParseWarning`]s instead.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading the roster document.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// The PDF is encrypted and cannot be read without a password.
    PasswordRequired,
    /// The roster template options are unusable (e.g. empty station code).
    InvalidOptions(String),
    /// A matching pattern built from the options failed to compile.
    PatternError(String),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::ParseError(msg) => write!(f, "parse error: {msg}"),
            RosterError::IoError(msg) => write!(f, "I/O error: {msg}"),
            RosterError::FontError(msg) => write!(f, "font error: {msg}"),
            RosterError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            RosterError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            RosterError::InvalidOptions(msg) => write!(f, "invalid roster options: {msg}"),
            RosterError::PatternError(msg) => write!(f, "pattern error: {msg}"),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::IoError(err.to_string())
    }
}

impl From<regex::Error> for RosterError {
    fn from(err: regex::Error) -> Self {
        RosterError::PatternError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing skipped input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ParseWarningCode {
    /// A line carried a role code but no terminator marker.
    MissingTerminator,
    /// A crew entry appeared before any flight line.
    OrphanEntry,
    /// A flight identifier had a length with no separator rule.
    UnsupportedIdentifier,
    /// A content stream operator could not be honored.
    UnsupportedOperator,
    /// Text was decoded without a Unicode mapping.
    EncodingFallback,
}

impl ParseWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ParseWarningCode::MissingTerminator => "MISSING_TERMINATOR",
            ParseWarningCode::OrphanEntry => "ORPHAN_ENTRY",
            ParseWarningCode::UnsupportedIdentifier => "UNSUPPORTED_IDENTIFIER",
            ParseWarningCode::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            ParseWarningCode::EncodingFallback => "ENCODING_FALLBACK",
        }
    }
}

impl fmt::Display for ParseWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while parsing a roster.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseWarning {
    /// Machine-readable warning code.
    pub code: ParseWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (0-indexed), if applicable.
    pub page: Option<usize>,
    /// Logical line index the warning refers to, if applicable.
    pub line: Option<usize>,
}

impl ParseWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ParseWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            line: None,
        }
    }

    /// Create a warning attached to a logical line.
    pub fn on_line(code: ParseWarningCode, description: impl Into<String>, line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::with_code(code, description)
        }
    }

    /// Set the page context, returning the modified warning (builder pattern).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(line) = self.line {
            write!(f, " [line {line}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseResult<T> {
    /// The produced value.
    pub value: T,
    /// Warnings collected while producing it.
    pub warnings: Vec<ParseWarning>,
}

impl<T> ParseResult<T> {
    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ParseWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Split into the value and its warnings.
    pub fn into_parts(self) -> (T, Vec<ParseWarning>) {
        (self.value, self.warnings)
    }
}
