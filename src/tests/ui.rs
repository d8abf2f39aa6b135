use super::entry_line;
use crate::config::Config;
use crate::heading::{Heading, HeadingKind};
use crate::highlight::CodeHighlighter;
use crate::notebook::RunningStatus;

fn header(level: u8, numbering: &str, collapsed: bool, running: RunningStatus) -> Heading {
    Heading {
        level,
        text: "Results".to_string(),
        numbering: numbering.to_string(),
        html: None,
        kind: HeadingKind::SectionHeader { collapsed, running },
        source_index: 0,
    }
}

fn render(heading: &Heading, config: &Config, ellipsis: bool) -> String {
    let highlighter = CodeHighlighter::new();
    entry_line(heading, config, ellipsis, &highlighter, "python", 80)
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

#[test]
fn test_header_row() {
    let row = render(
        &header(2, "1.2", false, RunningStatus::Idle),
        &Config::default(),
        true,
    );
    assert_eq!(row, "  ▾ 1.2 Results");
}

#[test]
fn test_collapsed_row_ellipsis_only_when_asked() {
    let heading = header(1, "3", true, RunningStatus::Idle);
    assert_eq!(render(&heading, &Config::default(), true), "▸ 3 Results …");
    assert_eq!(render(&heading, &Config::default(), false), "▸ 3 Results");
}

#[test]
fn test_running_indicator() {
    let row = render(
        &header(1, "", false, RunningStatus::Running),
        &Config::default(),
        false,
    );
    assert_eq!(row, "▾ Results ●");
}

#[test]
fn test_indent_shifts_without_numbered_h1() {
    let config = Config {
        numbering_h1: false,
        ..Config::default()
    };
    let row = render(&header(3, "1.1", false, RunningStatus::Idle), &config, false);
    assert_eq!(row, "  ▾ 1.1 Results");
}

#[test]
fn test_code_row_shows_prompt_and_first_line() {
    let heading = Heading {
        level: 2,
        text: "import os\nprint(os.getcwd())".to_string(),
        numbering: String::new(),
        html: None,
        kind: HeadingKind::Code {
            prompt: "[7]:".to_string(),
            running: RunningStatus::Error,
        },
        source_index: 3,
    };
    let row = render(&heading, &Config::default(), false);
    assert_eq!(row, "  [7]: import os ✖");
}
