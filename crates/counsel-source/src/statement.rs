//! Statement lookup over a tree-sitter-rust syntax tree
//!
//! A statement is any named child of a `block`, `source_file` or
//! `declaration_list`: `let` declarations, expression statements, tail
//! expressions and items all qualify. Comments do not.
//!
//! tree-sitter keeps macro bodies as opaque token trees. Brace-delimited
//! bodies such as `proptest! { ... }` are re-parsed as Rust so a line
//! inside them resolves to its own statement rather than the whole macro.

use crate::error::{SourceError, SourceResult};
use tree_sitter::{Node, Parser, Tree};

/// Node kinds whose named children are statements
const STATEMENT_PARENTS: &[&str] = &["block", "source_file", "declaration_list"];

/// Line span of one statement (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSpan {
    /// First line of the statement
    pub start_line: usize,
    /// Last line of the statement
    pub end_line: usize,
    /// tree-sitter node kind, e.g. `let_declaration`
    pub kind: &'static str,
}

impl StatementSpan {
    fn of(node: &Node<'_>) -> Self {
        Self {
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            kind: node.kind(),
        }
    }

    /// Check whether the span covers `line`
    #[inline]
    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// Parse Rust source with tree-sitter
///
/// # Errors
/// Returns error if the grammar cannot be loaded or no tree is produced
pub fn parse_rust(source: &str) -> SourceResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_rust::LANGUAGE.into())
        .map_err(|e| SourceError::ParserInit(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(SourceError::ParseFailed)?;
    if tree.root_node().has_error() {
        tracing::debug!("source contains syntax errors, searching recovered tree");
    }
    Ok(tree)
}

/// Find the statement behind `line`
///
/// Scans nodes in document order and stops at the first node that starts
/// on `line`; its innermost enclosing statement wins. When nothing starts
/// on `line` (continuation lines of a multi-line literal, for example) the
/// innermost statement spanning the line is used instead.
#[must_use]
pub fn enclosing_statement(tree: &Tree, line: usize) -> Option<StatementSpan> {
    let row = line.checked_sub(1)?;
    let root = tree.root_node();

    let mut open = Vec::new();
    first_starting_on(root, row, &mut open).or_else(|| innermost_spanning(root, row))
}

/// Find the statement behind `line`, looking inside brace-delimited
/// macro bodies
///
/// Falls back to the macro invocation itself when its body does not parse
/// into a statement covering `line`.
#[must_use]
pub fn locate_statement(source: &str, tree: &Tree, line: usize) -> Option<StatementSpan> {
    let statement = enclosing_statement(tree, line)?;
    let row = line - 1;

    match innermost_brace_body(tree.root_node(), row) {
        Some(body) if body.start_position().row + 1 >= statement.start_line => {
            statement_in_macro_body(source, &body, line).or(Some(statement))
        }
        _ => Some(statement),
    }
}

fn is_brace_body(node: &Node<'_>, row: usize) -> bool {
    node.kind() == "token_tree"
        && node
            .parent()
            .is_some_and(|parent| parent.kind() == "macro_invocation")
        && node.child(0).is_some_and(|open| open.kind() == "{")
        && node.start_position().row < row
        && row < node.end_position().row
}

fn innermost_brace_body(root: Node<'_>, row: usize) -> Option<Node<'_>> {
    let mut best = None;
    let mut current = Some(root);

    while let Some(node) = current.take() {
        if is_brace_body(&node, row) {
            best = Some(node);
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if spans_row(&child, row) {
                    current = Some(child);
                    break;
                }
            }
        }
    }

    best
}

/// Re-parse a macro body in place: the body is padded so its rows and
/// columns match the enclosing file
fn statement_in_macro_body(source: &str, body: &Node<'_>, line: usize) -> Option<StatementSpan> {
    let open = body.child(0)?;
    let inner = source.get(open.end_byte()..body.end_byte().saturating_sub(1))?;
    let at = open.end_position();
    let padded = format!("{}{}{}", "\n".repeat(at.row), " ".repeat(at.column), inner);

    let tree = parse_rust(&padded).ok()?;
    locate_statement(&padded, &tree, line)
}

fn is_statement(node: &Node<'_>) -> bool {
    node.is_named()
        && !node.is_error()
        && !node.kind().ends_with("comment")
        && node
            .parent()
            .is_some_and(|parent| STATEMENT_PARENTS.contains(&parent.kind()))
}

fn spans_row(node: &Node<'_>, row: usize) -> bool {
    node.start_position().row <= row && row <= node.end_position().row
}

fn first_starting_on(
    node: Node<'_>,
    row: usize,
    open: &mut Vec<StatementSpan>,
) -> Option<StatementSpan> {
    let statement = is_statement(&node);
    if statement {
        open.push(StatementSpan::of(&node));
    }

    if node.start_position().row == row {
        if let Some(found) = open.last() {
            return Some(*found);
        }
    }

    if spans_row(&node, row) {
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if let Some(found) = first_starting_on(child, row, open) {
                    return Some(found);
                }
            }
        }
    }

    if statement {
        open.pop();
    }
    None
}

fn innermost_spanning(root: Node<'_>, row: usize) -> Option<StatementSpan> {
    let mut best = None;
    let mut current = Some(root);

    while let Some(node) = current.take() {
        if is_statement(&node) {
            best = Some(StatementSpan::of(&node));
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if spans_row(&child, row) {
                    current = Some(child);
                    break;
                }
            }
        }
    }

    best
}
