//! Format trait and heading extraction for raw cell source.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing the
//! tree-sitter grammar and heading query specific to each. Cells without rendered output are
//! outlined from their source text through it.

pub mod markdown;

use crate::error::{Result, TocError};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Grammar and queries for a source format whose headings can be outlined.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing whole heading nodes.
    fn heading_query(&self) -> &str;
    /// Depth of a captured heading node, if it is one.
    fn heading_level(&self, node: Node<'_>) -> Option<u8>;
    /// Label text of a captured heading node.
    fn heading_text(&self, node: Node<'_>, source: &[u8]) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading found in raw source text.
pub struct SourceHeading {
    /// Depth from 1 to 6.
    pub level: u8,
    /// Label text without markup symbols.
    pub text: String,
    /// Byte offset of the heading in the source.
    pub byte_start: usize,
}

/// Parses `source` and returns its headings in document order.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded, the query does not compile, or the parser
/// gives up on the source.
pub fn extract_headings(format: &impl Format, source: &str) -> Result<Vec<SourceHeading>> {
    // The markdown grammar only closes a heading at a line ending, and the last line of a cell
    // usually has none.
    let terminated;
    let source = if source.ends_with('\n') {
        source
    } else {
        terminated = format!("{source}\n");
        terminated.as_str()
    };

    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TocError::Parse("parser produced no tree".to_string()))?;

    let query = Query::new(&language, format.heading_query())?;
    let bytes = source.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);

    let mut headings = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            if let Some(level) = format.heading_level(node) {
                headings.push(SourceHeading {
                    level,
                    text: format.heading_text(node, bytes),
                    byte_start: node.start_byte(),
                });
            }
        }
    }

    headings.sort_by_key(|h| h.byte_start);
    headings.dedup_by_key(|h| h.byte_start);
    Ok(headings)
}
