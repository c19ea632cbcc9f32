use tree_sitter::{Language as TsLanguage, Node, Tree, TreeCursor};

use crate::types::Span;

/// Get text content of a node from source
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Byte range covered by a node
pub fn node_span(node: &Node) -> Span {
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
    }
}

/// Check if a node is inside a comment
pub fn is_in_comment(node: &Node) -> bool {
    let kind = node.kind();
    if kind.ends_with("comment") {
        return true;
    }

    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind().ends_with("comment") {
            return true;
        }
        current = parent.parent();
    }

    false
}

/// Visit all nodes in the tree with a callback, using a provided cursor for advanced usage
pub fn visit_nodes_with_cursor<F>(node: Node, cursor: &mut TreeCursor, callback: &mut F)
where
    F: FnMut(Node),
{
    callback(node);

    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            visit_nodes_with_cursor(child, cursor, callback);

            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// Visit only the nodes whose byte range falls inside `span`
pub fn visit_nodes_within<F>(root: Node, span: Span, callback: &mut F)
where
    F: FnMut(Node),
{
    let mut cursor = root.walk();
    visit_nodes_with_cursor(root, &mut cursor, &mut |node| {
        if span.contains(&node_span(&node)) {
            callback(node);
        }
    });
}

/// Calculate line offset for a byte position
pub fn calculate_line_offset(source: &str, byte_offset: usize) -> u32 {
    source
        .bytes()
        .take(byte_offset)
        .filter(|&b| b == b'\n')
        .count() as u32
}

/// Parse source text with the given tree-sitter language
pub fn parse_source(source: &str, language: &TsLanguage) -> Option<Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(language).ok()?;
    parser.parse(source, None)
}
