use super::{Cell, CellKind, Notebook, RunningStatus};
use std::fs;
use tempfile::NamedTempFile;

const NOTEBOOK: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "id": "a1",
   "metadata": {"toc-hr-collapsed": true},
   "source": ["# Intro\n", "\n", "Some text"]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "id": "b2",
   "metadata": {},
   "outputs": [{"output_type": "error", "ename": "ValueError", "evalue": "", "traceback": []}],
   "source": "raise ValueError()"
  },
  {
   "cell_type": "code",
   "execution_count": null,
   "id": "c3",
   "metadata": {},
   "outputs": [],
   "source": []
  }
 ],
 "metadata": {"language_info": {"name": "python", "mimetype": "text/x-python"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

#[test]
fn test_from_json_reads_cells_and_live_state() {
    let nb = Notebook::from_json(NOTEBOOK).unwrap();

    assert_eq!(nb.cells.len(), 3);
    assert_eq!(nb.cells[0].cell_type, CellKind::Markdown);
    assert_eq!(nb.cells[0].text(), "# Intro\n\nSome text");
    assert!(nb.cells[0].metadata_flag("toc-hr-collapsed"));
    assert_eq!(nb.cells[1].status, RunningStatus::Error);
    assert_eq!(nb.cells[2].status, RunningStatus::Idle);
    assert_eq!(nb.language(), "python");
}

#[test]
fn test_prompt_labels() {
    let nb = Notebook::from_json(NOTEBOOK).unwrap();
    assert_eq!(nb.cells[1].prompt(), "[3]:");
    assert_eq!(nb.cells[2].prompt(), "[ ]:");

    let mut running = Cell::code("x = 1").with_execution_count(7);
    running.status = RunningStatus::Running;
    assert_eq!(running.prompt(), "[*]:");
}

#[test]
fn test_missing_metadata_flag_reads_false() {
    let mut cell = Cell::markdown("# A");
    assert!(!cell.metadata_flag("jp-MarkdownHeadingCollapsed"));

    cell.set_metadata_flag("jp-MarkdownHeadingCollapsed", true);
    assert!(cell.metadata_flag("jp-MarkdownHeadingCollapsed"));

    cell.set_metadata_flag("jp-MarkdownHeadingCollapsed", false);
    assert!(!cell.metadata.contains_key("jp-MarkdownHeadingCollapsed"));
}

#[test]
fn test_save_keeps_unknown_fields_and_updates_metadata() {
    let mut nb = Notebook::from_json(NOTEBOOK).unwrap();
    nb.cells[0].set_metadata_flag("toc-hr-collapsed", false);

    let file = NamedTempFile::new().unwrap();
    nb.save(file.path()).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(saved["nbformat"], 4);
    assert_eq!(saved["cells"][0]["id"], "a1");
    assert_eq!(saved["cells"][0]["source"][0], "# Intro\n");
    assert!(saved["cells"][0]["metadata"].get("toc-hr-collapsed").is_none());
    assert_eq!(saved["cells"][1]["execution_count"], 3);
    assert_eq!(saved["cells"][1]["outputs"][0]["ename"], "ValueError");

    let reloaded = Notebook::load(file.path()).unwrap();
    assert_eq!(reloaded.cells.len(), 3);
}

#[test]
fn test_invalid_json_is_an_error() {
    assert!(Notebook::from_json("{\"cells\": 3}").is_err());
}

#[test]
fn test_render_markdown_only_touches_markdown_cells() {
    let mut nb = Notebook::new(vec![Cell::markdown("# A"), Cell::code("1 + 1")]);
    nb.render_markdown();
    assert!(nb.cells[0].rendered.is_some());
    assert!(nb.cells[1].rendered.is_none());
}
