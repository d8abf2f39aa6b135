//! The notebook document model the outline is built from.
//!
//! Cells are read from nbformat 4 JSON. Fields this crate has no use for are carried through
//! untouched, so saving a notebook after toggling collapse state only changes cell metadata.
//! Alongside the persisted fields each cell has live state owned by the host: its execution
//! status, its rendered markdown, and whether it is currently hidden by a collapsed section.

use crate::error::Result;
use crate::markup::Element;
use crate::render;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Cell type as recorded in the notebook.
pub enum CellKind {
    /// Markdown prose, possibly with headings.
    Markdown,
    /// Executable source.
    Code,
    /// Unrendered text passed through verbatim.
    Raw,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Execution status of a code cell, ordered by how much attention it needs.
pub enum RunningStatus {
    #[default]
    /// Not executing.
    Idle,
    /// The last execution raised an error.
    Error,
    /// Queued for execution.
    Waiting,
    /// Currently executing.
    Running,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Cell source, either as one string or as a list of lines with their newlines.
pub enum Source {
    /// Split into lines, each keeping its trailing newline.
    Lines(Vec<String>),
    /// A single string.
    Text(String),
}

impl Source {
    #[must_use]
    /// The whole source as one string.
    pub fn text(&self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// One notebook cell with its persisted fields and live state.
pub struct Cell {
    /// Type of the cell.
    pub cell_type: CellKind,
    /// Source text.
    pub source: Source,
    #[serde(default)]
    /// Per-cell metadata store.
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    /// Fields carried through unchanged, such as `outputs` and `execution_count`.
    pub extra: Map<String, Value>,
    #[serde(skip)]
    /// Execution status reported by the host.
    pub status: RunningStatus,
    #[serde(skip)]
    /// Rendered markdown, when the host has rendered the cell.
    pub rendered: Option<Element>,
    #[serde(skip)]
    /// Hidden because an enclosing section is collapsed in the notebook.
    pub hidden: bool,
}

impl Cell {
    fn new(cell_type: CellKind, source: &str) -> Self {
        Self {
            cell_type,
            source: Source::Text(source.to_string()),
            metadata: Map::new(),
            extra: Map::new(),
            status: RunningStatus::Idle,
            rendered: None,
            hidden: false,
        }
    }

    #[must_use]
    /// A markdown cell with the given source.
    pub fn markdown(source: &str) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    #[must_use]
    /// A code cell with the given source and no execution count.
    pub fn code(source: &str) -> Self {
        let mut cell = Self::new(CellKind::Code, source);
        cell.extra.insert("execution_count".to_string(), Value::Null);
        cell.extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        cell
    }

    #[must_use]
    /// A raw cell with the given source.
    pub fn raw(source: &str) -> Self {
        Self::new(CellKind::Raw, source)
    }

    #[must_use]
    /// Sets the execution count of a code cell.
    pub fn with_execution_count(mut self, count: u64) -> Self {
        self.extra
            .insert("execution_count".to_string(), Value::from(count));
        self
    }

    #[must_use]
    /// The whole source as one string.
    pub fn text(&self) -> String {
        self.source.text()
    }

    #[must_use]
    /// Execution count of a code cell that has run.
    pub fn execution_count(&self) -> Option<u64> {
        self.extra.get("execution_count").and_then(Value::as_u64)
    }

    #[must_use]
    /// Execution prompt label, as shown beside a code cell.
    pub fn prompt(&self) -> String {
        match (self.status, self.execution_count()) {
            (RunningStatus::Running | RunningStatus::Waiting, _) => "[*]:".to_string(),
            (_, Some(count)) => format!("[{count}]:"),
            (_, None) => "[ ]:".to_string(),
        }
    }

    #[must_use]
    /// Whether any stored output is an error.
    pub fn has_error_output(&self) -> bool {
        self.extra
            .get("outputs")
            .and_then(Value::as_array)
            .is_some_and(|outputs| {
                outputs
                    .iter()
                    .any(|o| o.get("output_type").and_then(Value::as_str) == Some("error"))
            })
    }

    #[must_use]
    /// Reads a boolean metadata flag. A missing or non-boolean value reads as false.
    pub fn metadata_flag(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Stores `true` under `key`, or removes the key for `false`.
    pub fn set_metadata_flag(&mut self, key: &str, value: bool) {
        if value {
            self.metadata.insert(key.to_string(), Value::Bool(true));
        } else {
            self.metadata.remove(key);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// An nbformat 4 notebook.
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,
    #[serde(default)]
    /// Notebook-level metadata such as `language_info`.
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    /// Fields carried through unchanged, such as `nbformat`.
    pub extra: Map<String, Value>,
}

impl Notebook {
    #[must_use]
    /// A notebook holding `cells` and no metadata.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    /// Parses notebook JSON.
    ///
    /// Code cells whose stored outputs include an error start in the error state.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a notebook in nbformat 4 shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut notebook: Self = serde_json::from_str(json)?;
        for cell in &mut notebook.cells {
            if cell.cell_type == CellKind::Code && cell.has_error_output() {
                cell.status = RunningStatus::Error;
            }
        }
        Ok(notebook)
    }

    /// Reads a notebook file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a notebook.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let notebook = Self::from_json(&contents)?;
        debug!(path = %path.display(), cells = notebook.cells.len(), "loaded notebook");
        Ok(notebook)
    }

    /// Serializes the notebook in the indented layout Jupyter writes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the notebook back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "saved notebook");
        Ok(())
    }

    #[must_use]
    /// Kernel language name, used to pick syntax highlighting for code cells.
    pub fn language(&self) -> &str {
        self.metadata
            .get("language_info")
            .and_then(|info| info.get("name"))
            .or_else(|| {
                self.metadata
                    .get("kernelspec")
                    .and_then(|spec| spec.get("language"))
            })
            .and_then(Value::as_str)
            .unwrap_or("text")
    }

    /// Renders every markdown cell, replacing any earlier rendering.
    pub fn render_markdown(&mut self) {
        for cell in &mut self.cells {
            if cell.cell_type == CellKind::Markdown {
                cell.rendered = Some(render::render_markdown(&cell.text()));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/notebook.rs"]
mod tests;
