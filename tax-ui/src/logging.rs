//! Tracing setup for the command-line front end.
//!
//! Log records go to stderr so that reports on stdout stay machine-readable.
//! The level and an optional log file are known once the config file has been
//! read, so the subscriber is installed exactly once with both.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const DEFAULT_DIRECTIVE: &str = "info";

/// Local wall-clock timestamps with millisecond precision and UTC offset.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Picks the active filter: an explicit directive wins, then `RUST_LOG`,
/// then [`DEFAULT_DIRECTIVE`].
fn resolve_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when redirected.
/// - File: appended to, without colors, when `file` is given.
///
/// A second call leaves the first subscriber in place.
pub fn init_logging(
    directive: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let filter = resolve_filter(directive)?;

    let file_layer = file
        .map(|path| {
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))
        })
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTime)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
