//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! We try to find a notetoc.toml, and if present we load settings from there. These control how
//! the outline is numbered, which cell types show up in it, and whether collapsing a section in
//! the outline also collapses it in the notebook.

use facet::Facet;
use std::{fs, io};
use tracing::warn;

/// File looked up in the working directory for user settings.
pub const CONFIG_FILE: &str = "notetoc.toml";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// User preferences loaded from notetoc.toml or falling back to defaults.
pub struct Config {
    #[facet(default = true)]
    /// Show section numbering labels such as `2.1`.
    pub numbering: bool,
    #[facet(default = true)]
    /// Count h1 headings as the first numbered level.
    pub numbering_h1: bool,
    #[facet(default = false)]
    /// Include code cells in the outline.
    pub show_code: bool,
    #[facet(default = false)]
    /// Include markdown cells without headings in the outline.
    pub show_markdown: bool,
    #[facet(default = false)]
    /// Drive the notebook's own section collapse when collapsing in the outline.
    pub sync_collapse_state: bool,
    #[facet(default = 100)]
    /// Maximum width of cell previews in the panel.
    pub wrap_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            numbering: true,
            numbering_h1: true,
            show_code: false,
            show_markdown: false,
            sync_collapse_state: false,
            wrap_width: 100,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from notetoc.toml if present.
    ///
    /// A missing file is the normal case and yields defaults quietly. An unreadable or malformed
    /// file is logged and also yields defaults, so the outline keeps working.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(file = CONFIG_FILE, error = %e, "could not read settings, using defaults");
                Self::default()
            }
        }
    }

    #[must_use]
    /// Parse settings from TOML text, falling back to defaults when it does not parse.
    pub fn from_toml(contents: &str) -> Self {
        match facet_toml::from_str::<Self>(contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = ?e, "malformed settings, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
