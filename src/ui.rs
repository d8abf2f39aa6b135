//! The UI renders the outline panel next to a read-only view of the notebook.
//!
//! The outline sits on the left, one row per visible entry, indented by depth and prefixed with
//! its collapse marker and number. The notebook is on the right with the active cell
//! highlighted. A help bar at the bottom shows the settings and the last status message.

use crate::app_state::AppState;
use crate::config::Config;
use crate::heading::{Heading, HeadingKind};
use crate::highlight::CodeHighlighter;
use crate::notebook::{Cell, CellKind, RunningStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const PREVIEW_LINES: usize = 8;
const HELP: &str =
    "↑/↓: Cell | Shift+↑/↓: Entry | Space: Collapse | n/m/c/s: Settings | w: Save | q: Quit";

/// Renders the whole screen.
pub fn draw(f: &mut Frame, app: &mut AppState, highlighter: &CodeHighlighter) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    draw_outline(f, app, highlighter, columns[0]);
    draw_notebook(f, app, highlighter, columns[1]);
    draw_help(f, app, rows[1]);
}

fn draw_outline(f: &mut Frame, app: &mut AppState, highlighter: &CodeHighlighter, area: Rect) {
    app.set_viewport(usize::from(area.height.saturating_sub(2)));
    let language = app
        .notebook
        .as_ref()
        .map_or("text", |notebook| notebook.language());
    let width = usize::from(area.width.saturating_sub(2));
    let ellipsis = app.shows_ellipsis();

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|&i| {
            let heading = &app.outline[i];
            ListItem::new(entry_line(
                heading,
                &app.config,
                ellipsis,
                highlighter,
                language,
                width,
            ))
        })
        .collect();

    let title = match &app.path {
        Some(path) => format!("Contents: {}", path.display()),
        None => "Contents".to_string(),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default()
        .with_offset(app.scroll_offset)
        .with_selected(app.active_entry.and_then(|i| app.row_of(i)));
    f.render_stateful_widget(list, area, &mut state);
}

#[must_use]
/// One outline row: indentation, collapse marker, number, label and running indicator.
pub fn entry_line(
    heading: &Heading,
    config: &Config,
    ellipsis: bool,
    highlighter: &CodeHighlighter,
    language: &str,
    width: usize,
) -> Line<'static> {
    let depth = usize::from(heading.display_depth(config.numbering_h1));
    let mut spans = vec![Span::raw("  ".repeat(depth.saturating_sub(1)))];

    match &heading.kind {
        HeadingKind::SectionHeader { collapsed, .. } => {
            spans.push(Span::raw(if *collapsed { "▸ " } else { "▾ " }));
            if !heading.numbering.is_empty() {
                spans.push(Span::styled(
                    format!("{} ", heading.numbering),
                    Style::default().fg(Color::Cyan),
                ));
            }
            spans.push(Span::styled(
                heading.text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            if *collapsed && ellipsis {
                spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
            }
        }
        HeadingKind::MarkdownText => {
            spans.push(Span::styled(
                heading.text.clone(),
                Style::default().fg(Color::Gray),
            ));
        }
        HeadingKind::Code { prompt, .. } => {
            spans.push(Span::styled(
                format!("{prompt} "),
                Style::default().fg(Color::DarkGray),
            ));
            let room = width.saturating_sub(depth * 2 + prompt.chars().count() + 1);
            if let Some(line) = highlighter
                .preview(&heading.text, language, 1, room)
                .into_iter()
                .next()
            {
                spans.extend(line.spans);
            }
        }
    }

    if let Some(indicator) = heading.running().and_then(running_indicator) {
        spans.push(Span::raw(" "));
        spans.push(indicator);
    }
    Line::from(spans)
}

fn running_indicator(status: RunningStatus) -> Option<Span<'static>> {
    match status {
        RunningStatus::Idle => None,
        RunningStatus::Error => Some(Span::styled("✖", Style::default().fg(Color::Red))),
        RunningStatus::Waiting => Some(Span::styled("○", Style::default().fg(Color::Yellow))),
        RunningStatus::Running => Some(Span::styled("●", Style::default().fg(Color::Green))),
    }
}

fn draw_notebook(f: &mut Frame, app: &AppState, highlighter: &CodeHighlighter, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Notebook");
    let Some(notebook) = &app.notebook else {
        f.render_widget(Paragraph::new("No notebook open").block(block), area);
        return;
    };

    let language = notebook.language();
    let width = app.config.wrap_width;
    let mut lines = Vec::new();
    let mut active_start = 0;

    for (index, cell) in notebook.cells.iter().enumerate() {
        if cell.hidden {
            continue;
        }
        let active = index == app.active_cell;
        if active {
            active_start = lines.len();
        }
        lines.push(cell_header(cell, active));
        match cell.cell_type {
            CellKind::Code => {
                lines.extend(highlighter.preview(&cell.text(), language, PREVIEW_LINES, width));
            }
            CellKind::Markdown | CellKind::Raw => {
                lines.extend(cell.text().lines().take(PREVIEW_LINES).map(|line| {
                    let text: String = line.chars().take(width).collect();
                    if line.starts_with('#') {
                        Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
                    } else {
                        Line::raw(text)
                    }
                }));
            }
        }
        lines.push(Line::raw(""));
    }

    let scroll = u16::try_from(active_start.saturating_sub(1)).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn cell_header(cell: &Cell, active: bool) -> Line<'static> {
    let label = match cell.cell_type {
        CellKind::Code => cell.prompt(),
        CellKind::Markdown => "md".to_string(),
        CellKind::Raw => "raw".to_string(),
    };
    let style = if active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::styled(label, style)
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let flag = |on: bool| if on { "on" } else { "off" };
    let c = &app.config;
    let settings = format!(
        "numbering:{} markdown:{} code:{} sync:{}{}",
        flag(c.numbering),
        flag(c.show_markdown),
        flag(c.show_code),
        flag(c.sync_collapse_state),
        if app.dirty { " [modified]" } else { "" },
    );
    let text = app.message.as_deref().unwrap_or(HELP);
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(settings));
    f.render_widget(help, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
