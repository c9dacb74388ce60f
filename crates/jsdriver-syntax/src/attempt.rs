//! Outcome of a single parse attempt.

use thiserror::Error;

use crate::position::SourcePosition;
use crate::tree::SyntaxTree;

/// Result of parsing one text under one configuration.
///
/// A failure here is expected: it means the text does not belong to the
/// dialect the configuration describes, and a caller guessing the dialect
/// should move on to the next configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// The text parsed cleanly.
    Success(SyntaxTree),
    /// The text was rejected.
    Failure(ParseError),
}

impl AttemptResult {
    /// Returns whether the attempt produced a syntax tree.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A structured syntax error.
///
/// The message embeds the position as `(line:column)` when one is known, so
/// it reads well on its own once flattened into a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    position: Option<SourcePosition>,
}

impl ParseError {
    /// Creates an error without position information.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Creates an error anchored at `position`.
    #[must_use]
    pub fn at(description: impl AsRef<str>, position: SourcePosition) -> Self {
        Self {
            message: format!("{} ({position})", description.as_ref()),
            position: Some(position),
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the error was detected, if known.
    #[must_use]
    pub const fn position(&self) -> Option<SourcePosition> {
        self.position
    }

    /// Consumes the error, returning its message.
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }
}
