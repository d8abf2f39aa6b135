//! Rendered markup for markdown cells.
//!
//! The notebook host renders markdown into a small element tree, which the outline walks to find
//! headings. A [`Sanitizer`] serializes a heading's inner markup back to HTML, keeping only the
//! parts allowed into the outline.

use std::fmt::Write;

/// Class of the numbering span injected into rendered headings.
pub const NUMBERING_CLASS: &str = "toc-numbering-entry";

/// Anchor glyph appended to rendered headings as a permalink.
pub const ANCHOR_GLYPH: char = '¶';

/// Class of the permalink anchor appended to rendered headings.
pub const ANCHOR_CLASS: &str = "anchor-link";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Clone, Debug, PartialEq, Eq)]
/// A node of rendered markup.
pub enum Node {
    /// A tag with attributes and children.
    Element(Element),
    /// Unescaped text content.
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// A tag in the rendered markup tree.
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    /// Creates an element with no attributes or children.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    /// Adds an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    /// Appends a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    /// Appends a text child.
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::Text(text.to_string()))
    }

    #[must_use]
    /// Value of the named attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    #[must_use]
    /// Heading depth for `h1`..`h6` tags.
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    #[must_use]
    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    #[must_use]
    /// Whether the tag never has children or a closing tag, like `br`.
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    #[must_use]
    /// Depth of the first heading in document order.
    pub fn first_heading_level(&self) -> Option<u8> {
        self.children.iter().find_map(|child| match child {
            Node::Element(el) => el.heading_level().or_else(|| el.first_heading_level()),
            Node::Text(_) => None,
        })
    }

    /// Visits every heading element in document order.
    ///
    /// Headings are not searched for nested headings.
    pub fn for_each_heading_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if el.heading_level().is_some() {
                    f(el);
                } else {
                    el.for_each_heading_mut(f);
                }
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn escape_into(text: &str, out: &mut String, attr: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn write_open_tag(el: &Element, attrs: &[&(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in attrs {
        let _ = write!(out, " {name}=\"");
        escape_into(value, out, true);
        out.push('"');
    }
    out.push('>');
}

#[derive(Debug, Clone, Copy)]
/// Fixed allow-list handed to a [`Sanitizer`].
pub struct SanitizerOptions {
    /// Tags kept in the output. Other tags are dropped but their text is kept.
    pub allowed_tags: &'static [&'static str],
    /// Attributes kept on allowed tags.
    pub allowed_attributes: &'static [&'static str],
    /// Tags dropped together with everything inside them.
    pub discarded_tags: &'static [&'static str],
}

/// Allow-list used for heading markup in the outline.
pub const HEADING_SANITIZER_OPTIONS: SanitizerOptions = SanitizerOptions {
    allowed_tags: &[
        "p",
        "blockquote",
        "b",
        "i",
        "strong",
        "em",
        "strike",
        "code",
        "br",
        "div",
        "span",
        "pre",
        "del",
    ],
    allowed_attributes: &["class", "title"],
    discarded_tags: &["script", "style", "textarea", "option", "noscript"],
};

/// Removes unsafe markup from rendered nodes.
pub trait Sanitizer {
    /// Serializes `nodes` keeping only what `options` allows.
    fn sanitize(&self, nodes: &[Node], options: &SanitizerOptions) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
/// Sanitizer that applies the allow-list in [`SanitizerOptions`] directly.
pub struct AllowListSanitizer;

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, nodes: &[Node], options: &SanitizerOptions) -> String {
        let mut out = String::new();
        for node in nodes {
            sanitize_node(node, options, &mut out);
        }
        out
    }
}

fn sanitize_node(node: &Node, options: &SanitizerOptions, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, out, false),
        Node::Element(el) => {
            let tag = el.tag.as_str();
            if options.discarded_tags.contains(&tag) {
                return;
            }
            let allowed = options.allowed_tags.contains(&tag);
            if allowed {
                let attrs: Vec<_> = el
                    .attrs
                    .iter()
                    .filter(|(name, _)| options.allowed_attributes.contains(&name.as_str()))
                    .collect();
                write_open_tag(el, &attrs, out);
                if el.is_void() {
                    return;
                }
            }
            for child in &el.children {
                sanitize_node(child, options, out);
            }
            if allowed {
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/markup.rs"]
mod tests;
