//! Heading representation for notebook outlines.
//!
//! A heading is one row of the table of contents. It remembers which cell produced it, how deep
//! it sits in the outline, and the live state of that cell that the panel needs to show (whether
//! the section is collapsed, whether code in it is running).

use crate::notebook::RunningStatus;
use serde::Serialize;

/// Deepest heading level an outline entry can have.
pub const MAX_LEVEL: u8 = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One outline entry, rebuilt from scratch whenever the outline is.
pub struct Heading {
    /// Nesting depth, always within 1..=6.
    pub level: u8,
    /// Plain label. Code entries carry the whole cell source.
    pub text: String,
    /// Generated section number such as `2.1`, empty when numbering is off.
    pub numbering: String,
    /// Sanitized inner markup of a rendered heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// What kind of cell content produced this entry.
    pub kind: HeadingKind,
    /// Position of the originating cell in the notebook.
    pub source_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Source of an outline entry, with the state that only makes sense for that source.
pub enum HeadingKind {
    /// A heading inside a markdown cell.
    SectionHeader {
        /// Whether the section is collapsed according to the active collapse store.
        collapsed: bool,
        /// Busiest execution status among code cells inside the section.
        running: RunningStatus,
    },
    /// A markdown cell with no headings.
    MarkdownText,
    /// A code cell.
    Code {
        /// Execution prompt label such as `[3]:`.
        prompt: String,
        /// Execution status of the cell.
        running: RunningStatus,
    },
}

impl Heading {
    #[must_use]
    /// Whether this entry comes from a heading in a markdown cell.
    pub fn is_header(&self) -> bool {
        matches!(self.kind, HeadingKind::SectionHeader { .. })
    }

    #[must_use]
    /// Whether this entry is a collapsed section header.
    pub fn is_collapsed(&self) -> bool {
        matches!(self.kind, HeadingKind::SectionHeader { collapsed: true, .. })
    }

    #[must_use]
    /// Execution status shown next to the entry, if the entry tracks one.
    pub fn running(&self) -> Option<RunningStatus> {
        match self.kind {
            HeadingKind::SectionHeader { running, .. } | HeadingKind::Code { running, .. } => {
                Some(running)
            }
            HeadingKind::MarkdownText => None,
        }
    }

    #[must_use]
    /// Indentation depth for display, shifted up when h1 is not a numbered level.
    pub fn display_depth(&self, numbering_h1: bool) -> u8 {
        if numbering_h1 {
            self.level
        } else {
            self.level.saturating_sub(1).max(1)
        }
    }
}
