//! Section numbering for outline headings.
//!
//! Numbers are produced by a counter per depth that is threaded through a single outline build.
//! Bumping a depth forgets every deeper counter, so numbering is purely sequential in document
//! order: it does not check that headings are properly nested. A jump from level 1 to level 3
//! numbers the level 3 heading `1.1`, because the level 2 counter was never set.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
/// Counter per heading depth, valid for one outline build.
pub struct NumberingState {
    counters: BTreeMap<u8, u32>,
}

impl NumberingState {
    #[must_use]
    /// Starts with no counters set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more heading at `level` and returns its label.
    ///
    /// Counters deeper than `level` are unset. Level 0 is counted but never labelled, which is
    /// where h1 headings land when they are not a numbered level.
    pub fn advance(&mut self, level: u8) -> String {
        self.counters.retain(|&depth, _| depth <= level);
        *self.counters.entry(level).or_insert(0) += 1;
        if level == 0 {
            return String::new();
        }

        self.counters
            .range(1..=level)
            .map(|(_, count)| count.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Produces the numbering label for a heading at `level`.
///
/// The counters advance whether or not numbering is shown, so toggling labels on and off never
/// changes the numbers themselves.
pub fn generate_numbering(state: &mut NumberingState, level: u8, enabled: bool) -> String {
    let label = state.advance(level);
    if enabled {
        label
    } else {
        String::new()
    }
}

#[cfg(test)]
#[path = "tests/numbering.rs"]
mod tests;
