//! Outline construction.
//!
//! A build walks the notebook once, numbering headings as it goes, then settles the
//! per-section running status and drops the entry types the settings hide. The result
//! replaces the previous outline wholesale; entries are never patched in place.

use crate::collapse::{select_store, CollapseStore};
use crate::config::Config;
use crate::extract::HeadingExtractor;
use crate::heading::{Heading, HeadingKind};
use crate::markup::Sanitizer;
use crate::notebook::{Notebook, RunningStatus};
use crate::numbering::NumberingState;
use tracing::debug;

/// Builds outlines for one set of settings.
pub struct OutlineBuilder<'a> {
    config: Config,
    sanitizer: &'a dyn Sanitizer,
    store: Box<dyn CollapseStore>,
}

impl<'a> OutlineBuilder<'a> {
    #[must_use]
    /// Builder for `config`, reading collapse state from the store the config selects.
    pub fn new(config: Config, sanitizer: &'a dyn Sanitizer) -> Self {
        let store = select_store(&config);
        Self {
            config,
            sanitizer,
            store,
        }
    }

    /// Builds the outline of `notebook`, or an empty one when there is no notebook.
    ///
    /// Rendered markdown in the notebook gets fresh numbering spans.
    pub fn build(&self, notebook: Option<&mut Notebook>) -> Vec<Heading> {
        let Some(notebook) = notebook else {
            return Vec::new();
        };

        let mut state = NumberingState::new();
        let extractor = HeadingExtractor::new(&self.config, self.sanitizer);
        let mut outline = extractor.scan(notebook, self.store.as_ref(), &mut state);
        aggregate_running(&mut outline);

        let scanned = outline.len();
        outline.retain(|heading| match heading.kind {
            HeadingKind::SectionHeader { .. } => true,
            HeadingKind::MarkdownText => self.config.show_markdown,
            HeadingKind::Code { .. } => self.config.show_code,
        });
        debug!(scanned, kept = outline.len(), "built outline");
        outline
    }
}

/// Gives every header the busiest status among the code entries of its section.
fn aggregate_running(outline: &mut [Heading]) {
    for i in 0..outline.len() {
        if !outline[i].is_header() {
            continue;
        }
        let level = outline[i].level;
        let busiest = outline[i + 1..]
            .iter()
            .take_while(|h| !(h.is_header() && h.level <= level))
            .filter_map(|h| match h.kind {
                HeadingKind::Code { running, .. } => Some(running),
                _ => None,
            })
            .max()
            .unwrap_or(RunningStatus::Idle);
        if let HeadingKind::SectionHeader { running, .. } = &mut outline[i].kind {
            *running = busiest;
        }
    }
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
