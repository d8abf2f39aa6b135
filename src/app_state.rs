//! The state machine keeping the outline in step with the notebook.
//!
//! Everything that can change the outline arrives as a [`Trigger`] and is handled to completion
//! before the next one: the notebook is re-extracted, numbered and filtered into a fresh outline,
//! then the active entry is recomputed against the cursor. Triggers come from one event loop, so
//! no two rebuilds ever overlap.

use crate::active::{scroll_into_view, ActiveTracker};
use crate::collapse::{self, select_store, CollapseStore};
use crate::config::Config;
use crate::heading::Heading;
use crate::markup::AllowListSanitizer;
use crate::notebook::{Notebook, RunningStatus};
use crate::outline::OutlineBuilder;
use std::path::PathBuf;
use tracing::debug;

static SANITIZER: AllowListSanitizer = AllowListSanitizer;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something that happened to the notebook or the settings.
pub enum Trigger {
    /// Cell contents changed; markdown is re-rendered.
    ContentChanged,
    /// A code cell started, finished or queued.
    ExecutionChanged {
        /// Index of the cell.
        cell: usize,
        /// Its new status.
        status: RunningStatus,
    },
    /// The cursor moved to another cell.
    ActiveCellChanged(usize),
    /// Settings were replaced.
    SettingsChanged(Config),
    /// The collapse control of an outline entry was used.
    CollapseToggled(usize),
}

/// Bridges the notebook and the outline panel, maintaining session state.
pub struct AppState {
    /// The open notebook, if any.
    pub notebook: Option<Notebook>,
    /// File the notebook was loaded from.
    pub path: Option<PathBuf>,
    /// Current settings.
    pub config: Config,
    /// Current outline, replaced on every rebuild.
    pub outline: Vec<Heading>,
    /// Outline indices currently shown, with collapsed sections folded away.
    pub visible: Vec<usize>,
    /// Cell holding the document cursor.
    pub active_cell: usize,
    /// Outline index of the highlighted entry.
    pub active_entry: Option<usize>,
    /// First visible row of the outline panel.
    pub scroll_offset: usize,
    /// Rows available to the outline panel at the last draw.
    pub viewport_height: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Whether collapse metadata changed since the last save.
    pub dirty: bool,
    store: Box<dyn CollapseStore>,
    tracker: ActiveTracker,
}

impl AppState {
    #[must_use]
    /// Opens `notebook` with `config` and builds the first outline.
    ///
    /// Markdown is rendered, and collapse state persisted in the notebook is re-applied when it
    /// is synced with the notebook.
    pub fn new(notebook: Option<Notebook>, path: Option<PathBuf>, config: Config) -> Self {
        let store = select_store(&config);
        let mut state = Self {
            notebook,
            path,
            config,
            outline: Vec::new(),
            visible: Vec::new(),
            active_cell: 0,
            active_entry: None,
            scroll_offset: 0,
            viewport_height: 0,
            message: None,
            dirty: false,
            store,
            tracker: ActiveTracker::new(),
        };
        if let Some(notebook) = state.notebook.as_mut() {
            notebook.render_markdown();
            state.store.restore(notebook);
        }
        state.rebuild();
        state
    }

    /// Applies one trigger and brings the outline up to date.
    pub fn handle(&mut self, trigger: Trigger) {
        debug!(?trigger, "handling trigger");
        match trigger {
            Trigger::ContentChanged => {
                if let Some(notebook) = self.notebook.as_mut() {
                    notebook.render_markdown();
                }
                self.rebuild();
            }
            Trigger::ExecutionChanged { cell, status } => {
                if let Some(cell) = self
                    .notebook
                    .as_mut()
                    .and_then(|notebook| notebook.cells.get_mut(cell))
                {
                    cell.status = status;
                }
                self.rebuild();
            }
            Trigger::ActiveCellChanged(cell) => {
                self.active_cell = cell;
                self.track_active();
            }
            Trigger::SettingsChanged(config) => {
                self.store = select_store(&config);
                self.config = config;
                if let Some(notebook) = self.notebook.as_mut() {
                    for cell in &mut notebook.cells {
                        cell.hidden = false;
                    }
                    self.store.restore(notebook);
                }
                self.rebuild();
            }
            Trigger::CollapseToggled(entry) => self.toggle_entry(entry),
        }
    }

    /// Rebuilds the outline from the notebook and re-tracks the active entry.
    pub fn rebuild(&mut self) {
        let builder = OutlineBuilder::new(self.config.clone(), &SANITIZER);
        self.outline = builder.build(self.notebook.as_mut());
        self.visible = collapse::visible_entries(&self.outline);
        self.track_active();
    }

    fn track_active(&mut self) {
        let update = self.tracker.update(&self.outline, self.active_cell);
        self.active_entry = update.index;
        if update.scroll {
            if let Some(row) = update.index.and_then(|i| self.row_of(i)) {
                self.scroll_offset =
                    scroll_into_view(self.scroll_offset, self.viewport_height, row);
            }
        }
    }

    #[must_use]
    /// Panel row showing the outline entry `index`, if it is not folded away.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        self.visible.iter().position(|&i| i == index)
    }

    fn toggle_entry(&mut self, entry: usize) {
        let Some(heading) = self.outline.get(entry) else {
            return;
        };
        if !heading.is_header() {
            return;
        }
        let cell = heading.source_index;
        let Some(notebook) = self.notebook.as_mut() else {
            return;
        };
        let collapsed = collapse::toggle(notebook, self.store.as_ref(), cell);
        self.dirty = true;
        self.message = Some(if collapsed { "Collapsed" } else { "Expanded" }.to_string());
        self.rebuild();
    }

    /// Collapses or expands the section of the active entry.
    pub fn toggle_active(&mut self) {
        if let Some(entry) = self.active_entry {
            self.handle(Trigger::CollapseToggled(entry));
        }
    }

    /// Records the panel height and keeps the active entry in view.
    pub fn set_viewport(&mut self, height: usize) {
        if height == self.viewport_height {
            return;
        }
        self.viewport_height = height;
        if let Some(row) = self.active_entry.and_then(|i| self.row_of(i)) {
            self.scroll_offset = scroll_into_view(self.scroll_offset, height, row);
        }
    }

    #[must_use]
    /// Number of cells in the open notebook.
    pub fn cell_count(&self) -> usize {
        self.notebook.as_ref().map_or(0, |notebook| notebook.cells.len())
    }

    /// Moves the cursor to the next cell the notebook shows.
    pub fn next_cell(&mut self) {
        if let Some(next) = ((self.active_cell + 1)..self.cell_count()).find(|&i| self.is_shown(i))
        {
            self.handle(Trigger::ActiveCellChanged(next));
        }
    }

    /// Moves the cursor to the previous cell the notebook shows.
    pub fn prev_cell(&mut self) {
        if let Some(prev) = (0..self.active_cell).rev().find(|&i| self.is_shown(i)) {
            self.handle(Trigger::ActiveCellChanged(prev));
        }
    }

    fn is_shown(&self, index: usize) -> bool {
        self.notebook
            .as_ref()
            .and_then(|notebook| notebook.cells.get(index))
            .is_some_and(|cell| !cell.hidden)
    }

    /// Jumps the cursor to the cell of the next visible outline entry.
    pub fn next_entry(&mut self) {
        let target = self
            .visible
            .iter()
            .map(|&i| self.outline[i].source_index)
            .find(|&cell| cell > self.active_cell);
        if let Some(cell) = target {
            self.handle(Trigger::ActiveCellChanged(cell));
        }
    }

    /// Jumps the cursor to the cell of the previous visible outline entry.
    pub fn prev_entry(&mut self) {
        let target = self
            .visible
            .iter()
            .rev()
            .map(|&i| self.outline[i].source_index)
            .find(|&cell| cell < self.active_cell);
        if let Some(cell) = target {
            self.handle(Trigger::ActiveCellChanged(cell));
        }
    }

    /// Applies settings changed by `edit`.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut Config)) {
        let mut config = self.config.clone();
        edit(&mut config);
        self.handle(Trigger::SettingsChanged(config));
    }

    #[must_use]
    /// Whether collapsed headers show an ellipsis for content folded only in the outline.
    pub fn shows_ellipsis(&self) -> bool {
        !self.store.hides_cells()
    }

    /// Writes the notebook back to where it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> crate::Result<()> {
        if let (Some(notebook), Some(path)) = (&self.notebook, &self.path) {
            notebook.save(path)?;
            self.dirty = false;
            self.message = Some("Saved".to_string());
        } else {
            self.message = Some("Nothing to save".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
