// Tracing subscriber setup for the shells
//
// RUST_LOG, when set, wins over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines end up for a given run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File,
    /// Interactive terminal with no log file configured
    Disabled,
}

pub fn sink_for(config: &LoggingConfig, interactive: bool) -> LogSink {
    match (&config.file, interactive) {
        (Some(_), _) => LogSink::File,
        (None, false) => LogSink::Stderr,
        (None, true) => LogSink::Disabled,
    }
}

pub fn init(config: &LoggingConfig, interactive: bool) -> Result<LogSink> {
    let sink = sink_for(config, interactive);

    let writer = match (sink, &config.file) {
        (LogSink::Disabled, _) => return Ok(sink),
        (LogSink::File, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.trim().to_ascii_lowercase()));
    let ansi = sink == LogSink::Stderr;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(sink)
}
