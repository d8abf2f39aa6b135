use super::{render_markdown, slugify};
use crate::markup::{
    AllowListSanitizer, Element, Node, Sanitizer, ANCHOR_CLASS, HEADING_SANITIZER_OPTIONS,
};

fn headings(root: &mut Element) -> Vec<Element> {
    let mut found = Vec::new();
    root.for_each_heading_mut(&mut |h: &mut Element| found.push(h.clone()));
    found
}

#[test]
fn test_headings_get_id_and_anchor() {
    let mut root = render_markdown("# Hello *World*\n\ntext\n");
    let found = headings(&mut root);

    assert_eq!(found.len(), 1);
    let h1 = &found[0];
    assert_eq!(h1.tag, "h1");
    assert_eq!(h1.attr("id"), Some("Hello-World"));
    assert_eq!(h1.text_content(), "Hello World¶");
    match h1.children.last() {
        Some(Node::Element(anchor)) => {
            assert!(anchor.has_class(ANCHOR_CLASS));
            assert_eq!(anchor.attr("href"), Some("#Hello-World"));
        }
        _ => panic!("expected a trailing anchor"),
    }
}

#[test]
fn test_document_structure_is_kept() {
    let root = render_markdown("para one\n\n- item\n\n```python\nx = 1\n```\n");
    let tags: Vec<_> = root
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Element(el) => Some(el.tag.as_str()),
            Node::Text(_) => None,
        })
        .collect();
    assert_eq!(tags, ["p", "ul", "pre"]);
}

#[test]
fn test_setext_and_nested_headings_render() {
    let mut root = render_markdown("Title\n=====\n\n> ## Quoted\n");
    let levels: Vec<_> = headings(&mut root)
        .iter()
        .map(Element::heading_level)
        .collect();
    assert_eq!(levels, [Some(1), Some(2)]);
}

#[test]
fn test_slugify() {
    assert_eq!(slugify(" Intro to  Rust! "), "Intro-to--Rust");
}

#[test]
fn test_html_block_heading_becomes_an_element() {
    let mut root = render_markdown("<h2 id=\"setup\">Setup &amp; run</h2>");
    let found = headings(&mut root);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].heading_level(), Some(2));
    assert_eq!(found[0].attr("id"), Some("setup"));
    assert_eq!(found[0].text_content(), "Setup & run¶");
}

#[test]
fn test_inline_html_nests_markdown_text() {
    let mut root = render_markdown("## Inline <em>mixed</em> <span onclick=\"x()\">bit</span>");
    let found = headings(&mut root);

    assert_eq!(found[0].text_content(), "Inline mixed bit¶");
    let html = AllowListSanitizer.sanitize(&found[0].children, &HEADING_SANITIZER_OPTIONS);
    assert_eq!(html, "Inline <em>mixed</em> <span>bit</span>¶");
}

#[test]
fn test_unclosed_inline_html_ends_with_its_paragraph() {
    let root = render_markdown("a <b>bold\n\nnext");
    let paragraphs: Vec<_> = root
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Element(el) => Some(el.text_content()),
            Node::Text(_) => None,
        })
        .collect();
    assert_eq!(paragraphs, ["a bold", "next"]);
}
