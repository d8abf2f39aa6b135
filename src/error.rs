//! Error type for the fallible edges of the crate.
//!
//! Outline construction itself never fails: anything that goes wrong while extracting headings
//! degrades to an empty or default value. Only loading and saving notebooks, and setting up the
//! tree-sitter parser, can surface a [`TocError`].

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures while reading, writing or parsing a notebook document.
pub enum TocError {
    #[error("io error: {0}")]
    /// Reading or writing a notebook file failed.
    Io(#[from] std::io::Error),
    #[error("invalid notebook json: {0}")]
    /// The notebook is not valid nbformat JSON.
    Json(#[from] serde_json::Error),
    #[error("tree-sitter language error: {0}")]
    /// The markdown grammar could not be loaded into the parser.
    Language(#[from] tree_sitter::LanguageError),
    #[error("tree-sitter query error: {0}")]
    /// A heading query failed to compile.
    Query(#[from] tree_sitter::QueryError),
    #[error("{0}")]
    /// The parser gave up on a source string.
    Parse(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TocError>;
