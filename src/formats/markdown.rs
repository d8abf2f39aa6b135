//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides tree-sitter queries for parsing markdown cell source and extracting
//! ATX-style (`#` syntax) and setext-style (underlined) headings.

use crate::formats::Format;
use tree_sitter::Node;

/// Tree-sitter queries for markdown headings.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading) @heading\n(setext_heading) @heading"
    }

    fn heading_level(&self, node: Node<'_>) -> Option<u8> {
        let mut walk = node.walk();
        for child in node.children(&mut walk) {
            let level = match child.kind() {
                "atx_h1_marker" | "setext_h1_underline" => 1,
                "atx_h2_marker" | "setext_h2_underline" => 2,
                "atx_h3_marker" => 3,
                "atx_h4_marker" => 4,
                "atx_h5_marker" => 5,
                "atx_h6_marker" => 6,
                _ => continue,
            };
            return Some(level);
        }
        None
    }

    fn heading_text(&self, node: Node<'_>, source: &[u8]) -> String {
        let mut walk = node.walk();
        let content = node
            .children(&mut walk)
            .find(|child| matches!(child.kind(), "inline" | "paragraph"));
        let Some(content) = content else {
            return String::new();
        };
        let text = content.utf8_text(source).unwrap_or_default().trim();
        strip_closing_sequence(text).to_string()
    }
}

/// Drops an optional closing run of `#` from an ATX heading, as in `## Title ##`.
fn strip_closing_sequence(text: &str) -> &str {
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.len() == text.len() {
        return text;
    }
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.ends_with(char::is_whitespace) {
        without_hashes.trim_end()
    } else {
        text
    }
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
