//! Heading extraction from notebook cells.
//!
//! Every cell is classified by what it can contribute to the outline. Markdown with rendered
//! output is searched for heading tags, markdown without it is parsed from source, code cells
//! contribute one entry each. All of them draw numbers from the same [`NumberingState`], so
//! numbering runs continuously through the notebook.
//!
//! Rendered headings are the one place the outline writes into the document: it prefixes each
//! heading with a numbering span. The span from a previous pass is always removed first, so
//! extracting again gives the same result instead of stacking numbers.

use crate::collapse::CollapseStore;
use crate::config::Config;
use crate::formats::{extract_headings, markdown::MarkdownFormat};
use crate::heading::{Heading, HeadingKind, MAX_LEVEL};
use crate::markup::{
    Element, Node, Sanitizer, ANCHOR_CLASS, ANCHOR_GLYPH, HEADING_SANITIZER_OPTIONS,
    NUMBERING_CLASS,
};
use crate::notebook::{Cell, CellKind, Notebook, RunningStatus};
use crate::numbering::{generate_numbering, NumberingState};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading found in one cell, before it is placed in the outline.
pub struct FoundHeading {
    /// Tag depth from 1 to 6.
    pub level: u8,
    /// Plain text without the anchor glyph.
    pub text: String,
    /// Sanitized inner markup, for rendered headings.
    pub html: Option<String>,
    /// Numbering label, empty when numbering is off.
    pub numbering: String,
}

/// What a cell offers for extraction.
pub enum CellSource<'c> {
    /// Markdown the host has rendered.
    Rendered(&'c mut Element),
    /// Markdown that has not been rendered.
    Markdown(String),
    /// A code cell.
    Code {
        /// Cell source.
        source: String,
        /// Execution prompt label.
        prompt: String,
        /// Execution status.
        running: RunningStatus,
    },
}

impl<'c> CellSource<'c> {
    /// Classifies a cell. Raw cells contribute nothing.
    pub fn from_cell(cell: &'c mut Cell) -> Option<Self> {
        match cell.cell_type {
            CellKind::Markdown => {
                let source = cell.text();
                Some(match cell.rendered.as_mut() {
                    Some(rendered) => Self::Rendered(rendered),
                    None => Self::Markdown(source),
                })
            }
            CellKind::Code => Some(Self::Code {
                source: cell.text(),
                prompt: cell.prompt(),
                running: cell.status,
            }),
            CellKind::Raw => None,
        }
    }
}

/// Pulls headings out of cells using the numbering and sanitizer settings of one build.
pub struct HeadingExtractor<'a> {
    sanitizer: &'a dyn Sanitizer,
    numbering: bool,
    numbering_h1: bool,
}

impl<'a> HeadingExtractor<'a> {
    #[must_use]
    /// Extractor following `config`'s numbering settings.
    pub fn new(config: &Config, sanitizer: &'a dyn Sanitizer) -> Self {
        Self {
            sanitizer,
            numbering: config.numbering,
            numbering_h1: config.numbering_h1,
        }
    }

    fn label(&self, state: &mut NumberingState, level: u8) -> String {
        let depth = if self.numbering_h1 { level } else { level - 1 };
        generate_numbering(state, depth, self.numbering)
    }

    /// Headings inside rendered markup, in document order.
    ///
    /// Each heading has its previous numbering span replaced by a fresh one.
    pub fn rendered_headings(
        &self,
        container: &mut Element,
        state: &mut NumberingState,
    ) -> Vec<FoundHeading> {
        let mut found = Vec::new();
        container.for_each_heading_mut(&mut |heading: &mut Element| {
            let Some(level) = heading.heading_level() else {
                return;
            };
            heading.children.retain(|child| {
                !matches!(child, Node::Element(el) if el.has_class(NUMBERING_CLASS))
            });

            let content = without_anchor(heading);
            let text = content.text_content();
            let html = self
                .sanitizer
                .sanitize(&content.children, &HEADING_SANITIZER_OPTIONS);

            let numbering = self.label(state, level);
            if !numbering.is_empty() {
                let span = Element::new("span")
                    .with_attr("class", NUMBERING_CLASS)
                    .with_text(&format!("{numbering} "));
                heading.children.insert(0, Node::Element(span));
            }

            found.push(FoundHeading {
                level,
                text: text.trim().to_string(),
                html: Some(html.trim().to_string()),
                numbering,
            });
        });
        found
    }

    /// Headings parsed from markdown source.
    ///
    /// A parse failure is logged and treated as a cell without headings.
    pub fn source_headings(&self, source: &str, state: &mut NumberingState) -> Vec<FoundHeading> {
        let headings = match extract_headings(&MarkdownFormat, source) {
            Ok(headings) => headings,
            Err(e) => {
                warn!(error = %e, "could not parse markdown cell, skipping its headings");
                return Vec::new();
            }
        };
        headings
            .into_iter()
            .map(|h| {
                let level = h.level.clamp(1, MAX_LEVEL);
                FoundHeading {
                    level,
                    text: h.text,
                    html: None,
                    numbering: self.label(state, level),
                }
            })
            .collect()
    }

    /// Walks every cell in order and returns the unfiltered outline entries.
    ///
    /// Markdown cells with headings give one section header per heading, markdown cells without
    /// give one markdown-text entry, code cells give one code entry. Entries that are not
    /// headers sit one level below the nearest header above them.
    pub fn scan(
        &self,
        notebook: &mut Notebook,
        store: &dyn CollapseStore,
        state: &mut NumberingState,
    ) -> Vec<Heading> {
        let mut outline = Vec::new();
        let mut last_level = 0u8;

        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            let collapsed = store.is_collapsed(cell);
            let first_line = first_line(&cell.text());
            let Some(source) = CellSource::from_cell(cell) else {
                continue;
            };
            let below = (last_level + 1).min(MAX_LEVEL);

            let found = match source {
                CellSource::Rendered(container) => self.rendered_headings(container, state),
                CellSource::Markdown(text) => self.source_headings(&text, state),
                CellSource::Code {
                    source,
                    prompt,
                    running,
                } => {
                    outline.push(Heading {
                        level: below,
                        text: source,
                        numbering: String::new(),
                        html: None,
                        kind: HeadingKind::Code { prompt, running },
                        source_index: index,
                    });
                    continue;
                }
            };

            if found.is_empty() {
                outline.push(Heading {
                    level: below,
                    text: first_line,
                    numbering: String::new(),
                    html: None,
                    kind: HeadingKind::MarkdownText,
                    source_index: index,
                });
                continue;
            }

            for heading in found {
                last_level = heading.level;
                outline.push(Heading {
                    level: heading.level,
                    text: heading.text,
                    numbering: heading.numbering,
                    html: heading.html,
                    kind: HeadingKind::SectionHeader {
                        collapsed,
                        running: RunningStatus::Idle,
                    },
                    source_index: index,
                });
            }
        }

        outline
    }
}

/// The heading's children minus its permalink anchor.
///
/// Markup from a renderer that does not mark its anchor with a class loses a trailing glyph
/// instead.
fn without_anchor(heading: &Element) -> Element {
    let is_anchor =
        |node: &Node| matches!(node, Node::Element(el) if el.has_class(ANCHOR_CLASS));
    let mut children: Vec<Node> = heading
        .children
        .iter()
        .filter(|&node| !is_anchor(node))
        .cloned()
        .collect();

    if children.len() == heading.children.len() {
        if let Some(Node::Text(text)) = children.last_mut() {
            if let Some(stripped) = text.trim_end().strip_suffix(ANCHOR_GLYPH) {
                *text = stripped.to_string();
            }
        }
    }
    Element {
        children,
        ..Element::new(&heading.tag)
    }
}

/// First line of a cell with any text on it, trimmed.
fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[must_use]
/// Depth of the first heading in a markdown cell, used as the depth of the section it opens.
pub fn section_level(cell: &Cell) -> Option<u8> {
    if cell.cell_type != CellKind::Markdown {
        return None;
    }
    if let Some(rendered) = &cell.rendered {
        return rendered.first_heading_level();
    }
    match extract_headings(&MarkdownFormat, &cell.text()) {
        Ok(headings) => headings.first().map(|h| h.level),
        Err(e) => {
            warn!(error = %e, "could not parse markdown cell");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/extract.rs"]
mod tests;
