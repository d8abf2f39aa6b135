//! Collapse state of outline sections.
//!
//! A header's collapsed flag lives in its cell's metadata, never in the outline. Which key holds
//! it, and whether collapsing also hides cells in the notebook, depends on the store:
//!
//! - [`NativeCollapse`] uses the notebook's own key and hides the cells of the section, exactly
//!   as collapsing the heading in the notebook would.
//! - [`PrivateCollapse`] keeps a key of its own and leaves the notebook's cells alone. The
//!   section is only folded in the outline.

use crate::config::Config;
use crate::extract::section_level;
use crate::heading::Heading;
use crate::notebook::{Cell, Notebook};
use tracing::debug;

/// Metadata key of the notebook's own heading collapse.
pub const NATIVE_COLLAPSED_KEY: &str = "jp-MarkdownHeadingCollapsed";

/// Metadata key used when outline collapse is kept apart from the notebook.
pub const PRIVATE_COLLAPSED_KEY: &str = "toc-hr-collapsed";

/// Where a section header's collapsed flag is read from and written to.
pub trait CollapseStore {
    /// Metadata key holding the flag.
    fn key(&self) -> &'static str;

    /// Whether collapsing also hides the section's cells in the notebook.
    fn hides_cells(&self) -> bool;

    /// Reads the flag. A cell without it is expanded.
    fn is_collapsed(&self, cell: &Cell) -> bool {
        cell.metadata_flag(self.key())
    }

    /// Writes the flag for the cell at `index`, deleting it when expanding.
    fn set_collapsed(&self, notebook: &mut Notebook, index: usize, collapsed: bool);

    /// Re-applies persisted collapse state after a notebook is loaded.
    fn restore(&self, _notebook: &mut Notebook) {}
}

#[derive(Debug, Default, Clone, Copy)]
/// Collapse synced with the notebook's own section collapse.
pub struct NativeCollapse;

impl CollapseStore for NativeCollapse {
    fn key(&self) -> &'static str {
        NATIVE_COLLAPSED_KEY
    }

    fn hides_cells(&self) -> bool {
        true
    }

    fn set_collapsed(&self, notebook: &mut Notebook, index: usize, collapsed: bool) {
        let Some(cell) = notebook.cells.get_mut(index) else {
            return;
        };
        cell.set_metadata_flag(NATIVE_COLLAPSED_KEY, collapsed);
        set_section_hidden(notebook, index, collapsed);
    }

    fn restore(&self, notebook: &mut Notebook) {
        for index in 0..notebook.cells.len() {
            if notebook.cells[index].metadata_flag(NATIVE_COLLAPSED_KEY) {
                set_section_hidden(notebook, index, true);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
/// Collapse kept in outline-only metadata.
pub struct PrivateCollapse;

impl CollapseStore for PrivateCollapse {
    fn key(&self) -> &'static str {
        PRIVATE_COLLAPSED_KEY
    }

    fn hides_cells(&self) -> bool {
        false
    }

    fn set_collapsed(&self, notebook: &mut Notebook, index: usize, collapsed: bool) {
        if let Some(cell) = notebook.cells.get_mut(index) {
            cell.set_metadata_flag(PRIVATE_COLLAPSED_KEY, collapsed);
        }
    }
}

#[must_use]
/// Store matching the `sync_collapse_state` setting.
pub fn select_store(config: &Config) -> Box<dyn CollapseStore> {
    if config.sync_collapse_state {
        Box::new(NativeCollapse)
    } else {
        Box::new(PrivateCollapse)
    }
}

/// Index one past the last cell of the section opened by the header at `index`.
fn section_end(notebook: &Notebook, index: usize, level: u8) -> usize {
    notebook
        .cells
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, cell)| section_level(cell).is_some_and(|l| l <= level))
        .map_or(notebook.cells.len(), |(i, _)| i)
}

/// Hides or shows the cells under the header at `index`.
///
/// Showing leaves the sections of nested headers that are still collapsed hidden.
fn set_section_hidden(notebook: &mut Notebook, index: usize, hidden: bool) {
    let Some(level) = notebook.cells.get(index).and_then(section_level) else {
        return;
    };
    let end = section_end(notebook, index, level);

    let mut i = index + 1;
    while i < end {
        notebook.cells[i].hidden = hidden;
        if !hidden && notebook.cells[i].metadata_flag(NATIVE_COLLAPSED_KEY) {
            if let Some(nested) = section_level(&notebook.cells[i]) {
                i = section_end(notebook, i, nested).min(end);
                continue;
            }
        }
        i += 1;
    }
    debug!(header = index, cells = end - index - 1, hidden, "set section visibility");
}

/// Flips the collapsed flag of the header cell at `index` and returns the new state.
///
/// The caller rebuilds the outline afterwards so icons and the active entry follow.
pub fn toggle(notebook: &mut Notebook, store: &dyn CollapseStore, index: usize) -> bool {
    let Some(cell) = notebook.cells.get(index) else {
        return false;
    };
    let collapsed = store.is_collapsed(cell);
    store.set_collapsed(notebook, index, !collapsed);
    debug!(cell = index, key = store.key(), collapsed = !collapsed, "toggled section");
    !collapsed
}

#[must_use]
/// Indices of outline entries shown in the panel.
///
/// Entries inside the section of a collapsed header are left out, up to the next header at the
/// same depth or shallower.
pub fn visible_entries(outline: &[Heading]) -> Vec<usize> {
    let mut visible = Vec::new();
    let mut folded_at: Option<u8> = None;

    for (i, heading) in outline.iter().enumerate() {
        if let Some(level) = folded_at {
            if heading.is_header() && heading.level <= level {
                folded_at = None;
            } else {
                continue;
            }
        }
        visible.push(i);
        if heading.is_collapsed() {
            folded_at = Some(heading.level);
        }
    }
    visible
}

#[cfg(test)]
#[path = "tests/collapse.rs"]
mod tests;
