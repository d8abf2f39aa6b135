//! Markdown rendering into the markup tree.
//!
//! Plays the part of the notebook's markdown renderer: headings get a slug `id` and a trailing
//! permalink anchor, the same shape a notebook front end produces, so the outline sees the same
//! markup it would in a browser. HTML embedded in the markdown becomes elements too, so raw
//! `<h2>` tags count as headings and inline tags reach the sanitizer as markup rather than text.

use crate::markup::{Element, Node, ANCHOR_CLASS, ANCHOR_GLYPH};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::debug;

#[must_use]
/// Renders markdown source into a `div` container.
pub fn render_markdown(source: &str) -> Element {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(source, options);

    let mut tree = TreeBuilder::new();
    for event in parser {
        match event {
            Event::Start(Tag::HtmlBlock) => tree.open(Element::new("div"), Origin::HtmlBlock),
            Event::Start(tag) => tree.open(open(&tag), Origin::Markdown),
            Event::End(_) => tree.close_markdown(),
            Event::Html(html) | Event::InlineHtml(html) => tree.html(&html),
            Event::Text(text) => tree.push(Node::Text(text.to_string())),
            Event::Code(code) => tree.push(Node::Element(Element::new("code").with_text(&code))),
            Event::SoftBreak => tree.push(Node::Text("\n".to_string())),
            Event::HardBreak => tree.push(Node::Element(Element::new("br"))),
            Event::Rule => tree.push(Node::Element(Element::new("hr"))),
            _ => {}
        }
    }
    tree.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Opened by a markdown construct, closed by its end event.
    Markdown,
    /// Opened by an HTML tag, closed by a matching end tag or by the enclosing markdown.
    Html,
    /// Groups an HTML block; its children are spliced into the parent when it ends.
    HtmlBlock,
}

struct Frame {
    el: Element,
    origin: Origin,
}

/// Stack of open elements. The bottom frame is the container and is never popped early.
struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                el: Element::new("div"),
                origin: Origin::Markdown,
            }],
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.el.children.push(node);
        }
    }

    fn open(&mut self, el: Element, origin: Origin) {
        self.stack.push(Frame { el, origin });
    }

    fn close_top(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(Frame { mut el, origin }) = self.stack.pop() else {
            return;
        };
        if origin == Origin::HtmlBlock {
            for child in el.children {
                self.push(child);
            }
            return;
        }
        if el.heading_level().is_some() {
            add_anchor(&mut el);
        }
        self.push(Node::Element(el));
    }

    fn close_open_html(&mut self) {
        while self
            .stack
            .last()
            .is_some_and(|frame| frame.origin == Origin::Html)
        {
            self.close_top();
        }
    }

    /// Ends the innermost markdown construct, closing HTML tags left open inside it.
    fn close_markdown(&mut self) {
        self.close_open_html();
        self.close_top();
    }

    /// Closes the innermost open HTML element named `tag`. Unmatched end tags are ignored.
    fn close_html(&mut self, tag: &str) {
        let Some(depth) = self
            .stack
            .iter()
            .rev()
            .take_while(|frame| frame.origin == Origin::Html)
            .position(|frame| frame.el.tag == tag)
        else {
            return;
        };
        for _ in 0..=depth {
            self.close_top();
        }
    }

    /// Adds an HTML fragment. Markup that does not parse is kept as text from that point on.
    fn html(&mut self, html: &str) {
        let mut reader = Reader::from_str(html);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        loop {
            let position = usize::try_from(reader.buffer_position()).unwrap_or(html.len());
            match reader.read_event() {
                Ok(XmlEvent::Start(start)) => {
                    let el = element(&start);
                    if el.is_void() {
                        self.push(Node::Element(el));
                    } else {
                        self.open(el, Origin::Html);
                    }
                }
                Ok(XmlEvent::Empty(start)) => self.push(Node::Element(element(&start))),
                Ok(XmlEvent::End(end)) => {
                    let tag = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                    self.close_html(&tag);
                }
                Ok(XmlEvent::Text(text)) => {
                    if let Ok(text) = text.decode() {
                        self.push(Node::Text(text.into_owned()));
                    }
                }
                Ok(XmlEvent::CData(data)) => {
                    self.push(Node::Text(String::from_utf8_lossy(&data).into_owned()));
                }
                Ok(XmlEvent::GeneralRef(reference)) => {
                    self.push(Node::Text(resolve_reference(&reference)));
                }
                Ok(XmlEvent::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "keeping unparsable html as text");
                    self.push(Node::Text(html.get(position..).unwrap_or_default().to_string()));
                    break;
                }
            }
        }
    }

    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.close_top();
        }
        self.stack
            .pop()
            .map_or_else(|| Element::new("div"), |frame| frame.el)
    }
}

fn element(start: &BytesStart<'_>) -> Element {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut el = Element::new(&tag);
    for attr in start.html_attributes().flatten() {
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_or_else(|_| raw.to_string(), Cow::into_owned);
        el.attrs.push((name, value));
    }
    el
}

fn resolve_reference(reference: &BytesRef<'_>) -> String {
    if let Ok(Some(c)) = reference.resolve_char_ref() {
        return c.to_string();
    }
    let name = reference.decode().unwrap_or_default();
    match name.as_ref() {
        "nbsp" => "\u{a0}".to_string(),
        other => resolve_predefined_entity(other)
            .map_or_else(|| format!("&{other};"), str::to_string),
    }
}

fn open(tag: &Tag<'_>) -> Element {
    match tag {
        Tag::Heading { level, .. } => Element::new(match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }),
        Tag::Paragraph => Element::new("p"),
        Tag::BlockQuote(_) => Element::new("blockquote"),
        Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.is_empty() => {
            Element::new("pre").with_attr("class", &format!("language-{lang}"))
        }
        Tag::CodeBlock(_) => Element::new("pre"),
        Tag::List(Some(_)) => Element::new("ol"),
        Tag::List(None) => Element::new("ul"),
        Tag::Item => Element::new("li"),
        Tag::Emphasis => Element::new("em"),
        Tag::Strong => Element::new("strong"),
        Tag::Strikethrough => Element::new("del"),
        Tag::Link { dest_url, .. } => Element::new("a").with_attr("href", dest_url),
        Tag::Image { dest_url, .. } => Element::new("img").with_attr("src", dest_url),
        Tag::Table(_) => Element::new("table"),
        Tag::TableHead => Element::new("thead"),
        Tag::TableRow => Element::new("tr"),
        Tag::TableCell => Element::new("td"),
        _ => Element::new("div"),
    }
}

/// Gives a heading its slug id and permalink anchor.
fn add_anchor(heading: &mut Element) {
    let slug = slugify(&heading.text_content());
    if heading.attr("id").is_none() {
        heading.attrs.push(("id".to_string(), slug.clone()));
    }
    heading.children.push(Node::Element(
        Element::new("a")
            .with_attr("class", ANCHOR_CLASS)
            .with_attr("href", &format!("#{slug}"))
            .with_text(&ANCHOR_GLYPH.to_string()),
    ));
}

fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
