//! Error types for the parse engine adapter.
//!
//! A source text that does not satisfy a configuration is not an error at
//! this level: it is reported as [`crate::AttemptResult::Failure`]. The types
//! here describe the engine itself misbehaving, which callers must treat as
//! an infrastructure failure rather than a reason to try the next dialect.

use thiserror::Error;

use crate::grammar::Grammar;

/// Failures of the parse engine that abort a guessing sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Failed to load the Tree-sitter grammar into a parser.
    #[error("failed to initialise parser for {grammar}: {message}")]
    ParserInit {
        /// The grammar that failed to load.
        grammar: Grammar,
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter returned no syntax tree for the input.
    #[error("{grammar} parser produced no syntax tree")]
    NoTree {
        /// The grammar in use when parsing stopped.
        grammar: Grammar,
    },
}

impl EngineError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(grammar: Grammar, message: impl Into<String>) -> Self {
        Self::ParserInit {
            grammar,
            message: message.into(),
        }
    }

    /// Creates an error for a parse that yielded no tree.
    #[must_use]
    pub const fn no_tree(grammar: Grammar) -> Self {
        Self::NoTree { grammar }
    }
}
