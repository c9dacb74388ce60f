//! Owned, serialisable syntax trees.
//!
//! Tree-sitter trees borrow the parser's internal storage and cannot outlive
//! the source buffer. [`SyntaxTree`] copies what callers need into plain
//! values so a successful attempt can be handed across threads and encoded
//! as JSON.

use std::mem;

use serde::Serialize;

use crate::attempt::ParseError;
use crate::configuration::SourceType;
use crate::position::SourcePosition;

/// Deepest node an owned tree may hold, with the root at depth zero.
///
/// Encoding, comparing and dropping a [`SyntaxTree`] recurse once per level,
/// so deeper source is rejected while the tree is copied.
pub const MAX_NESTING_DEPTH: usize = 1_000;

const NESTING_TOO_DEEP: &str = "Maximum nesting depth exceeded";

/// Start and end of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    /// Where the node starts.
    pub start: SourcePosition,
    /// Where the node ends (exclusive).
    pub end: SourcePosition,
}

/// A node of an owned syntax tree.
///
/// Named grammar nodes are always kept. Anonymous tokens are kept only when
/// the grammar binds them to a field, which preserves operators such as the
/// `+` of a binary expression while dropping punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxNode {
    #[serde(rename = "type")]
    kind: String,
    start: usize,
    end: usize,
    loc: SourceSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Builds a node from its parts.
    #[must_use]
    pub fn new(kind: impl Into<String>, loc: SourceSpan) -> Self {
        Self {
            kind: kind.into(),
            start: loc.start.offset,
            end: loc.end.offset,
            loc,
            field: None,
            value: None,
            children: Vec::new(),
        }
    }

    /// Sets the field name this node occupies in its parent.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the source text of a leaf node.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Grammar node kind, for example `return_statement`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Byte range covered by the node.
    #[must_use]
    pub const fn byte_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Line and column span.
    #[must_use]
    pub const fn loc(&self) -> SourceSpan {
        self.loc
    }

    /// Field name in the parent, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Source text of a leaf node.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Child nodes in source order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Copies a Tree-sitter node and its descendants.
    ///
    /// The walk keeps its own stack of open ancestors instead of recursing,
    /// and stops with an error at the first node deeper than
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn from_tree_sitter(
        root: tree_sitter::Node<'_>,
        source: &str,
    ) -> Result<Self, ParseError> {
        let mut cursor = root.walk();
        let mut current = Self::opened_at(&cursor);
        let mut ancestors: Vec<Self> = Vec::new();

        loop {
            if enter_kept_child(&mut cursor) {
                if ancestors.len() >= MAX_NESTING_DEPTH {
                    return Err(ParseError::at(
                        NESTING_TOO_DEEP,
                        SourcePosition::start_of(cursor.node()),
                    ));
                }
                let child = Self::opened_at(&cursor);
                ancestors.push(mem::replace(&mut current, child));
                continue;
            }

            loop {
                current.close(cursor.node(), source);
                let Some(parent) = ancestors.pop() else {
                    return Ok(current);
                };
                let finished = mem::replace(&mut current, parent);
                current.children.push(finished);

                if advance_to_kept_sibling(&mut cursor) {
                    let sibling = Self::opened_at(&cursor);
                    ancestors.push(mem::replace(&mut current, sibling));
                    break;
                }
                cursor.goto_parent();
            }
        }
    }

    /// Starts a node for the cursor's current position; children follow.
    fn opened_at(cursor: &tree_sitter::TreeCursor<'_>) -> Self {
        let node = cursor.node();
        let loc = SourceSpan {
            start: SourcePosition::start_of(node),
            end: SourcePosition::end_of(node),
        };
        let mut opened = Self::new(node.kind(), loc);
        opened.field = cursor.field_name().map(str::to_owned);
        opened
    }

    /// Leaves keep their source text.
    fn close(&mut self, node: tree_sitter::Node<'_>, source: &str) {
        if self.children.is_empty() {
            self.value = source.get(node.byte_range()).map(str::to_owned);
        }
    }
}

/// Named nodes and field-bound tokens are copied; punctuation is not.
fn is_kept(cursor: &tree_sitter::TreeCursor<'_>) -> bool {
    cursor.node().is_named() || cursor.field_name().is_some()
}

/// Moves to the first kept child, leaving the cursor in place when there is
/// none.
fn enter_kept_child(cursor: &mut tree_sitter::TreeCursor<'_>) -> bool {
    if !cursor.goto_first_child() {
        return false;
    }
    if is_kept(cursor) || advance_to_kept_sibling(cursor) {
        return true;
    }
    cursor.goto_parent();
    false
}

/// Moves to the next kept sibling. On `false` the cursor rests on the last
/// sibling it inspected.
fn advance_to_kept_sibling(cursor: &mut tree_sitter::TreeCursor<'_>) -> bool {
    while cursor.goto_next_sibling() {
        if is_kept(cursor) {
            return true;
        }
    }
    false
}

/// Syntax tree produced by a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxTree {
    source_type: SourceType,
    #[serde(flatten)]
    root: SyntaxNode,
}

impl SyntaxTree {
    /// Wraps a root node.
    #[must_use]
    pub const fn new(source_type: SourceType, root: SyntaxNode) -> Self {
        Self { source_type, root }
    }

    /// Goal symbol the tree was parsed under.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Root node.
    #[must_use]
    pub const fn root(&self) -> &SyntaxNode {
        &self.root
    }
}
