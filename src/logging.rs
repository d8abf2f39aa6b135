//! Logging setup with `tracing-subscriber`.
//!
//! The outline panel owns the terminal while it runs, so the TUI only logs when given a file.
//! Printing mode logs to stderr, leaving stdout to the JSON outline. `RUST_LOG` overrides the
//! level picked from the verbosity flag.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where log lines go.
pub enum LogSink {
    /// Appended to a file.
    File(PathBuf),
    /// Written to standard error.
    Stderr,
    /// Discarded.
    Off,
}

#[must_use]
/// Level for a count of `-v` flags: warn, then info, debug, trace.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is already installed.
pub fn init_logging(sink: &LogSink, level: Level) -> io::Result<()> {
    let filter = build_env_filter(level);
    let result = match sink {
        LogSink::Off => return Ok(()),
        LogSink::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init(),
        LogSink::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init()
        }
    };
    result.map_err(io::Error::other)
}
