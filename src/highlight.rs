//! Syntax highlighting for code entries in the outline panel.
//!
//! Code cells are shown as a short highlighted preview in the notebook's kernel language, the
//! way the notebook itself shows them read-only. Unknown languages fall back to plain text.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

const THEME: &str = "base16-ocean.dark";

/// Highlights code previews with the bundled syntect syntaxes.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter {
    #[must_use]
    /// Loads the default syntaxes and theme.
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(THEME).unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    fn syntax_for(&self, language: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    #[must_use]
    /// Highlights up to `max_lines` lines of `source`, truncating each to `width` characters.
    pub fn preview(
        &self,
        source: &str,
        language: &str,
        max_lines: usize,
        width: usize,
    ) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(self.syntax_for(language), &self.theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(source).take(max_lines) {
            let mut remaining = width;
            let mut spans = Vec::new();
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            if regions.is_empty() {
                spans.push(Span::raw(truncate(line.trim_end(), width)));
            }
            for (style, text) in regions {
                let text = text.trim_end_matches(['\n', '\r']).replace('\t', "    ");
                if text.is_empty() || remaining == 0 {
                    continue;
                }
                let text = truncate(&text, remaining);
                remaining = remaining.saturating_sub(text.chars().count());
                let fg = style.foreground;
                spans.push(Span::styled(
                    text,
                    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
