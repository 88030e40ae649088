//! Tracing setup for the CLI.
//!
//! stderr gets compact human-readable output; when a log file is configured,
//! JSON lines are appended there as well. Filter precedence: `PULPIT_LOG`
//! env var > the configured level > `info`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FILTER_ENV: &str = "PULPIT_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut outcome = Ok(());
    INIT.call_once(|| outcome = install(log_level, log_file));
    outcome
}

fn install(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let sink = log_file.map(open_log_file).transpose()?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter_directives(log_level));

    // The file sink captures everything regardless of the stderr filter.
    let file_layer = sink.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(file.with_max_level(Level::TRACE))
            .with_target(false)
            .with_ansi(false)
            .json()
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn filter_directives(log_level: Option<&str>) -> EnvFilter {
    // PULPIT_LOG wins over whatever the config or CLI asked for.
    EnvFilter::try_from_env(FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")))
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            anyhow::anyhow!("failed to create log file directory {}: {e}", dir.display())
        })?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))
}
