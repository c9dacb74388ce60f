//! Shared position conversion helpers.
//!
//! Tree-sitter positions are zero-based. Syntax trees and error messages use
//! one-based line and column numbers, with the byte offset kept alongside.

use std::fmt;

use serde::Serialize;

/// A location in the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePosition {
    /// One-based line number.
    pub line: u32,
    /// One-based column number, counted in bytes.
    pub column: u32,
    /// Zero-based byte offset.
    pub offset: usize,
}

impl SourcePosition {
    /// Position where `node` starts.
    #[must_use]
    pub(crate) fn start_of(node: tree_sitter::Node<'_>) -> Self {
        Self::from_point(node.start_position(), node.start_byte())
    }

    /// Position where `node` ends.
    #[must_use]
    pub(crate) fn end_of(node: tree_sitter::Node<'_>) -> Self {
        Self::from_point(node.end_position(), node.end_byte())
    }

    fn from_point(point: tree_sitter::Point, offset: usize) -> Self {
        let (line, column) = point_to_one_based(point);
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_first_line_and_column() {
        assert_eq!(point_to_one_based(tree_sitter::Point::new(0, 0)), (1, 1));
    }

    #[test]
    fn display_uses_line_colon_column() {
        let position = SourcePosition {
            line: 3,
            column: 7,
            offset: 40,
        };
        assert_eq!(position.to_string(), "3:7");
    }
}
