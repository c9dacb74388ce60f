//! Tree-sitter grammar selection.
//!
//! Plain JavaScript is parsed with `tree-sitter-javascript`. Configurations
//! that enable type annotations switch to the TSX grammar shipped with
//! `tree-sitter-typescript`, which accepts Flow-style annotations alongside
//! JSX.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Grammars the engine can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Grammar {
    /// ECMAScript with JSX.
    #[default]
    JavaScript,
    /// ECMAScript with JSX and type annotations.
    ///
    /// Parsed with the TSX grammar. Flow-only forms such as call signatures
    /// with unnamed parameters (`(string): boolean`) are not recognised.
    Typed,
}

impl Grammar {
    /// Returns the Tree-sitter language for this grammar.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Typed => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the lower-case identifier for this grammar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Typed => "typed",
        }
    }

    /// Returns all grammars.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::JavaScript, Self::Typed]
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a grammar identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported grammar: '{0}'")]
pub struct GrammarParseError(String);

impl GrammarParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for Grammar {
    type Err = GrammarParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typed" | "tsx" | "flow" => Ok(Self::Typed),
            other => Err(GrammarParseError(other.to_owned())),
        }
    }
}
