//! notetoc: a numbered, collapsible table of contents for notebooks.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use notetoc::app_state::AppState;
use notetoc::config::Config;
use notetoc::highlight::CodeHighlighter;
use notetoc::logging::{init_logging, level_for, LogSink};
use notetoc::notebook::Notebook;
use notetoc::ui;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "notetoc")]
#[command(about = "Numbered, collapsible table of contents for notebooks", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Notebook to open
    #[arg(value_name = "NOTEBOOK")]
    path: PathBuf,

    /// Print the outline as JSON instead of opening the panel
    #[arg(long)]
    print: bool,

    /// Hide section numbers
    #[arg(long)]
    no_numbering: bool,

    /// Start numbering at h2, leaving h1 unnumbered
    #[arg(long)]
    no_numbering_h1: bool,

    /// Include code cells in the outline
    #[arg(long)]
    show_code: bool,

    /// Include markdown cells without headings in the outline
    #[arg(long)]
    show_markdown: bool,

    /// Collapse sections in the notebook too
    #[arg(long)]
    sync_collapse: bool,

    /// Append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let sink = match (&args.log_file, args.print) {
        (Some(path), _) => LogSink::File(path.clone()),
        (None, true) => LogSink::Stderr,
        (None, false) => LogSink::Off,
    };
    init_logging(&sink, level_for(args.verbose))?;

    let mut cfg = Config::load();

    // Override config with command line args
    if args.no_numbering {
        cfg.numbering = false;
    }
    if args.no_numbering_h1 {
        cfg.numbering_h1 = false;
    }
    cfg.show_code |= args.show_code;
    cfg.show_markdown |= args.show_markdown;
    cfg.sync_collapse_state |= args.sync_collapse;

    let notebook = Notebook::load(&args.path).map_err(io::Error::other)?;
    info!(path = %args.path.display(), cells = notebook.cells.len(), "opened notebook");
    let app = AppState::new(Some(notebook), Some(args.path), cfg);

    if args.print {
        let json = serde_json::to_string_pretty(&app.outline).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    run_tui(app)
}

fn run_tui(mut app: AppState) -> io::Result<()> {
    let highlighter = CodeHighlighter::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &highlighter);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    } else if app.dirty {
        eprintln!("Collapse changes were not saved");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    highlighter: &CodeHighlighter,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, highlighter))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        app.message = None;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Up if shift => app.prev_entry(),
            KeyCode::Down if shift => app.next_entry(),
            KeyCode::Char('K') => app.prev_entry(),
            KeyCode::Char('J') => app.next_entry(),
            KeyCode::Up | KeyCode::Char('k') => app.prev_cell(),
            KeyCode::Down | KeyCode::Char('j') => app.next_cell(),
            KeyCode::Char(' ') => app.toggle_active(),
            KeyCode::Char('n') => app.update_config(|c| c.numbering = !c.numbering),
            KeyCode::Char('m') => app.update_config(|c| c.show_markdown = !c.show_markdown),
            KeyCode::Char('c') => app.update_config(|c| c.show_code = !c.show_code),
            KeyCode::Char('s') => {
                app.update_config(|c| c.sync_collapse_state = !c.sync_collapse_state);
            }
            KeyCode::Char('w') => {
                if let Err(e) = app.save() {
                    app.message = Some(format!("Error saving: {e}"));
                }
            }
            _ => {}
        }
    }
}
