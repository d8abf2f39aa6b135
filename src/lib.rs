//! notetoc: a numbered, collapsible table of contents for notebook documents.
//!
//! Notebook cells are scanned into an outline of section headers (and optionally prose and
//! code entries), numbered hierarchically across cells, and kept in step with the cursor and
//! with execution state. [`app_state::AppState`] drives the whole cycle from triggers; the rest
//! of the crate are the pieces it composes.

pub mod active;
pub mod app_state;
pub mod collapse;
pub mod config;
pub mod error;
pub mod extract;
pub mod formats;
pub mod heading;
pub mod highlight;
pub mod logging;
pub mod markup;
pub mod notebook;
pub mod numbering;
pub mod outline;
pub mod render;
pub mod ui;

pub use error::{Result, TocError};
