//! Tree-sitter backed parse engine.
//!
//! [`ParseEngine`] is the seam between dialect guessing and the actual
//! parser. Implementations report rejected input as
//! [`AttemptResult::Failure`] and reserve `Err` for the engine itself
//! failing, so callers never have to inspect error subtypes to decide
//! whether to keep trying.

use crate::attempt::{AttemptResult, ParseError};
use crate::configuration::ParseConfiguration;
use crate::error::EngineError;
use crate::grammar::Grammar;
use crate::position::SourcePosition;
use crate::rules::first_violation;
use crate::tree::{SyntaxNode, SyntaxTree};

/// Parses source text under a configuration.
pub trait ParseEngine: Send + Sync {
    /// Parses `source` as a whole program.
    ///
    /// # Errors
    ///
    /// Returns an error only when the engine cannot run at all. Source text
    /// the configuration rejects yields `Ok(AttemptResult::Failure(..))`.
    fn attempt(
        &self,
        source: &str,
        configuration: &ParseConfiguration,
    ) -> Result<AttemptResult, EngineError>;
}

/// Engine that parses with Tree-sitter grammars.
///
/// Every call builds its own Tree-sitter parser, so the engine holds no
/// state and can be shared freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterEngine;

impl TreeSitterEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses `source` as a single expression.
    ///
    /// The text must consist of exactly one expression statement; the
    /// returned tree is rooted at that expression. Object literals must be
    /// parenthesised, as they would be in statement position.
    ///
    /// # Errors
    ///
    /// Returns an error when the grammar cannot be loaded or Tree-sitter
    /// produces no tree.
    pub fn parse_expression(
        &self,
        source: &str,
        configuration: &ParseConfiguration,
    ) -> Result<AttemptResult, EngineError> {
        let tree = parse_tree(configuration.grammar(), source)?;
        let root = tree.root_node();
        if let Some(error) = first_violation(root, source, configuration) {
            return Ok(AttemptResult::Failure(error));
        }

        let mut cursor = root.walk();
        let mut statements = root
            .named_children(&mut cursor)
            .filter(|node| node.kind() != "comment");

        let Some(statement) = statements.next() else {
            let end = SourcePosition::end_of(root);
            return Ok(AttemptResult::Failure(ParseError::at(
                "Unexpected token",
                end,
            )));
        };
        if let Some(extra) = statements.next() {
            return Ok(unexpected_at(extra));
        }
        if statement.kind() != "expression_statement" {
            return Ok(unexpected_at(statement));
        }

        let mut statement_cursor = statement.walk();
        let expression = statement
            .named_children(&mut statement_cursor)
            .find(|node| node.kind() != "comment");
        let Some(expression) = expression else {
            return Ok(unexpected_at(statement));
        };

        Ok(owned_tree(expression, source, configuration))
    }
}

impl ParseEngine for TreeSitterEngine {
    fn attempt(
        &self,
        source: &str,
        configuration: &ParseConfiguration,
    ) -> Result<AttemptResult, EngineError> {
        let tree = parse_tree(configuration.grammar(), source)?;
        let root = tree.root_node();
        if let Some(error) = first_violation(root, source, configuration) {
            return Ok(AttemptResult::Failure(error));
        }

        Ok(owned_tree(root, source, configuration))
    }
}

fn parse_tree(grammar: Grammar, source: &str) -> Result<tree_sitter::Tree, EngineError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar.tree_sitter_language())
        .map_err(|e| EngineError::parser_init(grammar, e.to_string()))?;
    parser
        .parse(source, None)
        .ok_or_else(|| EngineError::no_tree(grammar))
}

fn owned_tree(
    node: tree_sitter::Node<'_>,
    source: &str,
    configuration: &ParseConfiguration,
) -> AttemptResult {
    SyntaxNode::from_tree_sitter(node, source).map_or_else(AttemptResult::Failure, |root| {
        AttemptResult::Success(SyntaxTree::new(configuration.source_type(), root))
    })
}

fn unexpected_at(node: tree_sitter::Node<'_>) -> AttemptResult {
    AttemptResult::Failure(ParseError::at(
        "Unexpected token",
        SourcePosition::start_of(node),
    ))
}
