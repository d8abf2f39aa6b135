use super::OutlineBuilder;
use crate::config::Config;
use crate::heading::HeadingKind;
use crate::markup::{AllowListSanitizer, Element, Node, NUMBERING_CLASS};
use crate::notebook::{Cell, Notebook, RunningStatus};

fn build(nb: &mut Notebook, config: Config) -> Vec<crate::heading::Heading> {
    OutlineBuilder::new(config, &AllowListSanitizer).build(Some(nb))
}

fn sample() -> Notebook {
    Notebook::new(vec![
        Cell::markdown("# Intro"),
        Cell::markdown("## Setup\n\nInstall things."),
        Cell::code("import os").with_execution_count(1),
        Cell::markdown("# Results"),
        Cell::markdown("Plain prose, no heading."),
        Cell::markdown("### Detail"),
    ])
}

#[test]
fn test_numbering_across_cells() {
    let outline = build(&mut sample(), Config::default());

    let numbers: Vec<_> = outline.iter().map(|h| h.numbering.as_str()).collect();
    assert_eq!(numbers, ["1", "1.1", "2", "2.1"]);
    let texts: Vec<_> = outline.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, ["Intro", "Setup", "Results", "Detail"]);
}

#[test]
fn test_numbering_disabled_keeps_text_and_level() {
    let config = Config {
        numbering: false,
        ..Config::default()
    };
    let numbered = build(&mut sample(), Config::default());
    let plain = build(&mut sample(), config);

    assert!(plain.iter().all(|h| h.numbering.is_empty()));
    for (a, b) in numbered.iter().zip(&plain) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.level, b.level);
    }
}

#[test]
fn test_h1_not_numbered() {
    let config = Config {
        numbering_h1: false,
        ..Config::default()
    };
    let mut nb = Notebook::new(vec![
        Cell::markdown("# Title"),
        Cell::markdown("## First"),
        Cell::markdown("## Second\n### Sub"),
    ]);
    let outline = build(&mut nb, config);

    let numbers: Vec<_> = outline.iter().map(|h| h.numbering.as_str()).collect();
    assert_eq!(numbers, ["", "1", "2", "2.1"]);
    assert_eq!(outline[0].level, 1, "level keeps the tag depth");
}

#[test]
fn test_filters_follow_settings() {
    let hidden = build(&mut sample(), Config::default());
    assert!(hidden.iter().all(crate::heading::Heading::is_header));

    let config = Config {
        show_code: true,
        show_markdown: true,
        ..Config::default()
    };
    let shown = build(&mut sample(), config);
    let kinds: Vec<_> = shown
        .iter()
        .map(|h| match h.kind {
            HeadingKind::SectionHeader { .. } => "header",
            HeadingKind::MarkdownText => "markdown",
            HeadingKind::Code { .. } => "code",
        })
        .collect();
    assert_eq!(
        kinds,
        ["header", "header", "code", "header", "markdown", "header"]
    );

    let code = &shown[2];
    assert_eq!(code.level, 3, "one below the `## Setup` header");
    assert_eq!(code.text, "import os");
    assert!(matches!(&code.kind, HeadingKind::Code { prompt, .. } if prompt == "[1]:"));

    let prose = &shown[4];
    assert_eq!(prose.text, "Plain prose, no heading.");
    assert_eq!(prose.level, 2);
    assert!(prose.numbering.is_empty());
}

#[test]
fn test_source_index_is_non_decreasing() {
    let config = Config {
        show_code: true,
        show_markdown: true,
        ..Config::default()
    };
    let mut nb = sample();
    nb.cells.insert(2, Cell::markdown("## A\n## B"));
    nb.cells.push(Cell::raw("raw text"));
    let outline = build(&mut nb, config);

    assert!(outline
        .windows(2)
        .all(|w| w[0].source_index <= w[1].source_index));
    assert_eq!(outline[2].source_index, outline[3].source_index);
}

#[test]
fn test_running_status_rolls_up_to_section_headers() {
    let mut nb = sample();
    nb.cells[2].status = RunningStatus::Running;
    let outline = build(&mut nb, Config::default());

    let running: Vec<_> = outline.iter().map(|h| h.running()).collect();
    assert_eq!(
        running,
        [
            Some(RunningStatus::Running),
            Some(RunningStatus::Running),
            Some(RunningStatus::Idle),
            Some(RunningStatus::Idle),
        ]
    );
}

#[test]
fn test_rendered_extraction_is_idempotent() {
    let mut nb = sample();
    nb.render_markdown();
    let builder = OutlineBuilder::new(Config::default(), &AllowListSanitizer);

    let first = builder.build(Some(&mut nb));
    let second = builder.build(Some(&mut nb));
    assert_eq!(first, second);
    assert_eq!(first[0].html.as_deref(), Some("Intro"));
    assert_eq!(first[0].text, "Intro");

    let heading = match &nb.cells[0].rendered.as_ref().unwrap().children[0] {
        Node::Element(el) => el.clone(),
        Node::Text(_) => panic!("expected a heading"),
    };
    let spans = heading
        .children
        .iter()
        .filter(|c| matches!(c, Node::Element(el) if el.has_class(NUMBERING_CLASS)))
        .count();
    assert_eq!(spans, 1, "numbering markup does not accumulate");
    assert_eq!(heading.text_content(), "1 Intro¶");
}

#[test]
fn test_rendered_markup_is_sanitized() {
    let heading = Element::new("h2")
        .with_text("Safe ")
        .with_child(Node::Element(Element::new("script").with_text("evil()")))
        .with_child(Node::Element(
            Element::new("code").with_attr("onclick", "x").with_text("code"),
        ));
    let mut cell = Cell::markdown("## Safe `code`");
    cell.rendered = Some(Element::new("div").with_child(Node::Element(heading)));
    let mut nb = Notebook::new(vec![cell]);

    let outline = build(&mut nb, Config::default());
    assert_eq!(outline[0].html.as_deref(), Some("Safe <code>code</code>"));
    assert_eq!(outline[0].text, "Safe evil()code");
}

#[test]
fn test_heading_without_text_yields_empty_label() {
    let mut cell = Cell::markdown("#");
    cell.rendered = Some(Element::new("div").with_child(Node::Element(Element::new("h1"))));
    let mut nb = Notebook::new(vec![cell]);

    let outline = build(&mut nb, Config::default());
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].text, "");
}

#[test]
fn test_absent_notebook_gives_empty_outline() {
    let builder = OutlineBuilder::new(Config::default(), &AllowListSanitizer);
    assert!(builder.build(None).is_empty());
}

#[test]
fn test_html_headings_in_rendered_cells() {
    let mut nb = Notebook::new(vec![
        Cell::markdown("# Intro"),
        Cell::markdown("<h2>Setup</h2>"),
        Cell::markdown("## Inline <em>mixed</em>"),
    ]);
    nb.render_markdown();
    let outline = build(&mut nb, Config::default());

    let entries: Vec<_> = outline
        .iter()
        .map(|h| (h.text.as_str(), h.numbering.as_str()))
        .collect();
    assert_eq!(entries, [("Intro", "1"), ("Setup", "1.1"), ("Inline mixed", "1.2")]);
    assert_eq!(outline[2].html.as_deref(), Some("Inline <em>mixed</em>"));
}

#[test]
fn test_unrendered_single_line_headings() {
    let mut nb = Notebook::new(vec![
        Cell::markdown("# Intro"),
        Cell::markdown("Setext\n======"),
    ]);
    let outline = build(&mut nb, Config::default());

    assert!(outline.iter().all(crate::heading::Heading::is_header));
    let numbers: Vec<_> = outline.iter().map(|h| h.numbering.as_str()).collect();
    assert_eq!(numbers, ["1", "2"]);
}
