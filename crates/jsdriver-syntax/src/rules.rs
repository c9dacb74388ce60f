//! Dialect and extension rules checked on top of the Tree-sitter grammars.
//!
//! The grammars accept the union of every dialect: top-level `return`,
//! `import` inside scripts, `with` inside modules and every supported
//! extension. This module walks a parsed tree in document order and reports
//! the first construct the active configuration forbids.

use tree_sitter::Node;

use crate::attempt::ParseError;
use crate::configuration::{ParseConfiguration, SourceType};
use crate::extension::GrammarExtension;
use crate::position::SourcePosition;

/// Node kinds that open a function body.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
];

const RETURN_OUTSIDE_FUNCTION: &str = "'return' outside of function";
const IMPORT_EXPORT_IN_SCRIPT: &str =
    "'import' and 'export' may appear only with 'sourceType: module'";
const IMPORT_EXPORT_NOT_TOP_LEVEL: &str = "'import' and 'export' may only appear at the top level";
const IMPORT_META_IN_SCRIPT: &str = "import.meta may appear only with 'sourceType: module'";
const AWAIT_OUTSIDE_ASYNC: &str = "'await' is only allowed within async functions";
const WITH_IN_STRICT_MODE: &str = "'with' in strict mode";
const LEGACY_OCTAL: &str = "Legacy octal literals are not allowed in strict mode";
const LEADING_ZERO_DECIMAL: &str = "Decimals with leading zeros are not allowed in strict mode";
const DELETE_LOCAL: &str = "Deleting local variable in strict mode";

/// Returns the first violation in `root`, if any.
///
/// Grammar errors take precedence: dialect rules are only meaningful on a
/// tree without `ERROR` or `MISSING` nodes.
pub(crate) fn first_violation(
    root: Node<'_>,
    source: &str,
    configuration: &ParseConfiguration,
) -> Option<ParseError> {
    if root.has_error() {
        return find_preorder(root, syntax_error);
    }

    find_preorder(root, |node| {
        extension_violation(node, source, configuration)
            .or_else(|| dialect_violation(node, source, configuration))
    })
}

/// Visits `root` and its descendants in document order until `visit`
/// returns a value.
fn find_preorder<'tree, T>(
    root: Node<'tree>,
    mut visit: impl FnMut(Node<'tree>) -> Option<T>,
) -> Option<T> {
    let mut cursor = root.walk();
    loop {
        if let Some(found) = visit(cursor.node()) {
            return Some(found);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn syntax_error(node: Node<'_>) -> Option<ParseError> {
    let position = SourcePosition::start_of(node);
    if node.is_missing() {
        let description = format!("Unexpected token, expected \"{}\"", node.kind());
        return Some(ParseError::at(description, position));
    }
    node.is_error()
        .then(|| ParseError::at("Unexpected token", position))
}

fn extension_violation(
    node: Node<'_>,
    source: &str,
    configuration: &ParseConfiguration,
) -> Option<ParseError> {
    let required = required_extension(node, source)?;
    if configuration.enables(required) {
        return None;
    }
    let description =
        format!("This experimental syntax requires enabling the parser plugin: '{required}'");
    Some(ParseError::at(description, SourcePosition::start_of(node)))
}

/// Maps a node to the extension that introduces its syntax.
fn required_extension(node: Node<'_>, source: &str) -> Option<GrammarExtension> {
    let kind = node.kind();
    match kind {
        "jsx_element" | "jsx_self_closing_element" => Some(GrammarExtension::Jsx),
        "decorator" => Some(GrammarExtension::Decorators2),
        "field_definition" | "public_field_definition" => Some(GrammarExtension::ClassProperties),
        "private_property_identifier" => {
            if parent_kind(node) == Some("method_definition") {
                Some(GrammarExtension::ClassPrivateMethods)
            } else {
                Some(GrammarExtension::ClassPrivateProperties)
            }
        }
        "optional_chain" => Some(GrammarExtension::OptionalChaining),
        "binary_expression" | "augmented_assignment_expression" => {
            operator_text(node, source)
                .filter(|operator| matches!(*operator, "??" | "??="))
                .map(|_| GrammarExtension::NullishCoalescingOperator)
        }
        "number" => numeric_extension(node_text(node, source)),
        "spread_element" => {
            (parent_kind(node) == Some("object")).then_some(GrammarExtension::ObjectRestSpread)
        }
        "rest_pattern" => (parent_kind(node) == Some("object_pattern"))
            .then_some(GrammarExtension::ObjectRestSpread),
        "call_expression" => node
            .child_by_field_name("function")
            .filter(|callee| callee.kind() == "import")
            .map(|_| GrammarExtension::DynamicImport),
        "meta_property" | "member_expression" => {
            is_import_meta(node, source).then_some(GrammarExtension::ImportMeta)
        }
        "catch_clause" => node
            .child_by_field_name("parameter")
            .is_none()
            .then_some(GrammarExtension::OptionalCatchBinding),
        "namespace_export" => Some(GrammarExtension::ExportExtensions),
        _ if FUNCTION_KINDS.contains(&kind) => (has_token(node, "async") && has_token(node, "*"))
            .then_some(GrammarExtension::AsyncGenerators),
        _ => None,
    }
}

fn numeric_extension(text: &str) -> Option<GrammarExtension> {
    if text.contains('_') {
        Some(GrammarExtension::NumericSeparator)
    } else if text.ends_with('n') {
        Some(GrammarExtension::BigInt)
    } else {
        None
    }
}

fn dialect_violation(
    node: Node<'_>,
    source: &str,
    configuration: &ParseConfiguration,
) -> Option<ParseError> {
    let strict = configuration.source_type().is_strict();
    let description = match node.kind() {
        "return_statement" => (!configuration.allow_return_outside_function()
            && enclosing_function(node).is_none())
        .then_some(RETURN_OUTSIDE_FUNCTION),
        "import_statement" | "export_statement" => import_export_violation(node, configuration),
        "meta_property" | "member_expression" => (configuration.source_type()
            == SourceType::Script
            && is_import_meta(node, source))
        .then_some(IMPORT_META_IN_SCRIPT),
        "await_expression" => await_violation(node, configuration),
        "with_statement" => strict.then_some(WITH_IN_STRICT_MODE),
        "number" if strict => leading_zero_violation(node_text(node, source)),
        "unary_expression" => (strict && deletes_identifier(node, source)).then_some(DELETE_LOCAL),
        _ => None,
    }?;
    Some(ParseError::at(description, SourcePosition::start_of(node)))
}

fn import_export_violation(
    node: Node<'_>,
    configuration: &ParseConfiguration,
) -> Option<&'static str> {
    if configuration.source_type() == SourceType::Script {
        return Some(IMPORT_EXPORT_IN_SCRIPT);
    }
    let top_level = parent_kind(node).is_none_or(|kind| kind == "program");
    (!configuration.allow_import_export_everywhere() && !top_level)
        .then_some(IMPORT_EXPORT_NOT_TOP_LEVEL)
}

fn await_violation(node: Node<'_>, configuration: &ParseConfiguration) -> Option<&'static str> {
    match enclosing_function(node) {
        Some(function) => (!has_token(function, "async")).then_some(AWAIT_OUTSIDE_ASYNC),
        None => (configuration.source_type() == SourceType::Script).then_some(AWAIT_OUTSIDE_ASYNC),
    }
}

fn leading_zero_violation(text: &str) -> Option<&'static str> {
    let digits = text.strip_prefix('0')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        Some(LEGACY_OCTAL)
    } else {
        Some(LEADING_ZERO_DECIMAL)
    }
}

fn deletes_identifier(node: Node<'_>, source: &str) -> bool {
    operator_text(node, source) == Some("delete")
        && node
            .child_by_field_name("argument")
            .is_some_and(|argument| argument.kind() == "identifier")
}

fn enclosing_function(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(candidate) = current {
        if FUNCTION_KINDS.contains(&candidate.kind()) {
            return Some(candidate);
        }
        current = candidate.parent();
    }
    None
}

/// Matches `import.meta`, which some grammar versions model as a member
/// access on an `import` node rather than a meta property.
fn is_import_meta(node: Node<'_>, source: &str) -> bool {
    match node.kind() {
        "meta_property" => node_text(node, source).starts_with("import"),
        "member_expression" => node
            .child_by_field_name("object")
            .is_some_and(|object| object.kind() == "import"),
        _ => false,
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn operator_text<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name("operator")
        .map(|operator| node_text(operator, source))
}

fn parent_kind(node: Node<'_>) -> Option<&'static str> {
    node.parent().map(|parent| parent.kind())
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}
