//! Active entry tracking.
//!
//! The active entry is the section header the document cursor is in: the header of the active
//! cell itself, or else the nearest header above it. Only section headers are ever active.

use crate::heading::Heading;

#[must_use]
/// Outline index of the active entry for the cell at `active_cell`.
pub fn find_active_index(outline: &[Heading], active_cell: usize) -> Option<usize> {
    let headers = || outline.iter().enumerate().filter(|(_, h)| h.is_header());

    if let Some((i, _)) = headers().find(|(_, h)| h.source_index == active_cell) {
        return Some(i);
    }

    // The nearest preceding header is the last one, or the one whose next header lies past the
    // active cell.
    headers()
        .filter(|(_, h)| h.source_index < active_cell)
        .find(|&(i, _)| {
            outline[i + 1..]
                .iter()
                .find(|h| h.is_header())
                .is_none_or(|next| next.source_index > active_cell)
        })
        .map(|(i, _)| i)
}

#[must_use]
/// The active entry for the cell at `active_cell`, if any header precedes it.
pub fn find_active(outline: &[Heading], active_cell: usize) -> Option<&Heading> {
    find_active_index(outline, active_cell).map(|i| &outline[i])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of recomputing the active entry.
pub struct ActiveUpdate {
    /// Outline index of the active entry.
    pub index: Option<usize>,
    /// Whether the entry just became active and should be scrolled into view.
    pub scroll: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EntryKey {
    source_index: usize,
    ordinal: usize,
}

impl EntryKey {
    fn of(outline: &[Heading], index: usize) -> Self {
        let source_index = outline[index].source_index;
        let ordinal = outline[..index]
            .iter()
            .filter(|h| h.source_index == source_index)
            .count();
        Self {
            source_index,
            ordinal,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Remembers the active entry across rebuilds so the view scrolls only when it changes.
///
/// Outlines are rebuilt from scratch, so the entry is remembered by its cell and its position
/// among that cell's entries rather than by outline index.
pub struct ActiveTracker {
    current: Option<EntryKey>,
}

impl ActiveTracker {
    #[must_use]
    /// Tracker with no active entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the active entry for `active_cell`.
    pub fn update(&mut self, outline: &[Heading], active_cell: usize) -> ActiveUpdate {
        let index = find_active_index(outline, active_cell);
        let key = index.map(|i| EntryKey::of(outline, i));
        let scroll = key.is_some() && key != self.current;
        self.current = key;
        ActiveUpdate { index, scroll }
    }
}

#[must_use]
/// Scroll offset that brings `row` into a viewport of `height` rows.
///
/// The offset only moves when the row is outside the viewport, and then by as little as needed.
pub fn scroll_into_view(offset: usize, height: usize, row: usize) -> usize {
    if height == 0 {
        return offset;
    }
    if row < offset {
        row
    } else if row >= offset + height {
        row + 1 - height
    } else {
        offset
    }
}

#[cfg(test)]
#[path = "tests/active.rs"]
mod tests;
