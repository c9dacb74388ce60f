//! Tree-sitter powered parse engine for the JavaScript driver.
//!
//! This crate parses JavaScript source text under a named
//! [`ParseConfiguration`] and reports either an owned [`SyntaxTree`] or a
//! structured [`ParseError`]:
//!
//! - **Dialects** via [`SourceType`]: module goal (strict mode,
//!   `import`/`export`, top-level `await`) or script goal.
//! - **Grammar extensions** via [`GrammarExtension`]: constructs belonging to
//!   an extension the configuration does not enable are rejected.
//! - **Engine seam** via the [`ParseEngine`] trait, implemented by
//!   [`TreeSitterEngine`].
//!
//! Rejected input is an ordinary value ([`AttemptResult::Failure`]); only a
//! broken engine surfaces as [`EngineError`].
//!
//! # Example
//!
//! ```text
//! attempt("return 1;", MODULE) => Failure("'return' outside of function (1:1)")
//! attempt("return 1;", SCRIPT) => Success(SyntaxTree { sourceType: script, .. })
//! ```

mod attempt;
mod configuration;
mod engine;
mod error;
mod extension;
mod grammar;
mod position;
mod rules;
mod tree;

pub use attempt::{AttemptResult, ParseError};
pub use configuration::{ParseConfiguration, SourceType};
pub use engine::{ParseEngine, TreeSitterEngine};
pub use error::EngineError;
pub use extension::{ExtensionParseError, GrammarExtension};
pub use grammar::{Grammar, GrammarParseError};
pub use position::SourcePosition;
pub use tree::{MAX_NESTING_DEPTH, SourceSpan, SyntaxNode, SyntaxTree};
