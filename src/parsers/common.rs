use tree_sitter::{Language, Node as TSNode, Parser, Point, Tree};

use crate::core::{AnalysisError, Result, Span};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| AnalysisError::TreeSitter(format!("Failed to set language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse `source` and reject trees that contain syntax errors.
    pub fn parse_source(&mut self, file_id: &str, source: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::parse(file_id, "parser produced no tree", 1))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, message) = match first_error(&root) {
                Some(node) if node.is_missing() => (
                    node.start_position().row + 1,
                    format!("missing `{}`", node.kind()),
                ),
                Some(node) => (node.start_position().row + 1, "invalid syntax".to_string()),
                None => (1, "invalid syntax".to_string()),
            };
            return Err(AnalysisError::parse(file_id, message, line));
        }

        // The grammar still accepts Python 2 statements that CPython rejects.
        if let Some(node) = first_legacy_statement(&root) {
            let keyword = if node.kind() == "exec_statement" { "exec" } else { "print" };
            return Err(AnalysisError::parse(
                file_id,
                format!("Python 2 `{}` statement", keyword),
                node.start_position().row + 1,
            ));
        }

        Ok(tree)
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error<'a>(node: &TSNode<'a>) -> Option<TSNode<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(&child) {
            return Some(found);
        }
    }
    None
}

/// First `exec` statement, or `print` statement without a `>>` chevron.
///
/// `print >> f, x` is kept: Python 3 reads it as a tuple expression.
fn first_legacy_statement<'a>(node: &TSNode<'a>) -> Option<TSNode<'a>> {
    match node.kind() {
        "exec_statement" => return Some(*node),
        "print_statement" if find_child_by_kind(node, "chevron").is_none() => {
            return Some(*node)
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = first_legacy_statement(&child) {
            return Some(found);
        }
    }
    None
}

fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// Line span of a node, ending at its last non-comment token.
///
/// Comments trailing a block belong to the block in the tree but not to the
/// definition. A node whose end sits at column 0 ends on the previous line.
pub fn node_span(node: &TSNode) -> Span {
    let start = node.start_position().row + 1;
    let end_pos = content_end(node);
    let mut end = end_pos.row + 1;
    if end_pos.column == 0 && end > start {
        end -= 1;
    }
    Span::new(start, end)
}

fn content_end(node: &TSNode) -> Point {
    let mut cursor = node.walk();
    let last = node
        .children(&mut cursor)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .find(|child| child.kind() != "comment");
    match last {
        Some(child) => content_end(&child),
        None => node.end_position(),
    }
}

/// Newline-joined text of lines `[span.start, span.end]`, clamped to the file.
pub fn slice_lines(source: &str, span: Span) -> String {
    source
        .lines()
        .skip(span.start.saturating_sub(1))
        .take(span.line_count())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn named_children<'a>(node: &TSNode<'a>) -> Vec<TSNode<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}
