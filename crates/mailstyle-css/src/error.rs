//! Error types for the CSS front end.

use strum_macros::Display;

/// Result type alias for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// The category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParseErrorKind {
    /// A block consumer went deeper than the nesting ceiling.
    #[strum(serialize = "bad nesting")]
    BadNesting,
    /// No usable style sheet could be produced.
    #[strum(serialize = "invalid syntax")]
    InvalidSyntax,
}

/// A parse failure: its category plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CSS parse error ({kind}): {message}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Details for logs.
    pub message: String,
}

impl ParseError {
    /// Create an error of `kind`.
    #[must_use]
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The nesting ceiling was exceeded.
    #[must_use]
    pub fn bad_nesting() -> Self {
        Self::new(ParseErrorKind::BadNesting, "max nesting reached, ignore style")
    }

    /// Create an invalid-syntax error.
    #[must_use]
    pub fn invalid_syntax(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::InvalidSyntax, message)
    }
}
