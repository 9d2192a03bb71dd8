//! File + stdout logging for hosts that do not run Bevy's `LogPlugin`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,chartmark=debug";

const LOG_FILE_NAME: &str = "chartmark.log";

/// Install a global subscriber writing to stdout and `logs_dir/chartmark.log`.
///
/// The returned guard must be kept alive for the file writer to flush.
/// Returns `None` if the directory cannot be created or a subscriber is
/// already installed.
pub fn setup_logging(logs_dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(logs_dir).is_err() {
        eprintln!("Failed to create logs directory {:?}", logs_dir);
        return None;
    }

    let log_file_path = logs_dir.join(LOG_FILE_NAME);

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let _ = writeln!(file, "{}", session_separator(chrono::Local::now()));
    }

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI colors for file output
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .ok()?;

    Some(guard)
}

/// [`setup_logging`] into the platform logs directory.
pub fn setup_default_logging() -> Option<WorkerGuard> {
    setup_logging(&crate::paths::logs_dir())
}

fn session_separator<Tz: chrono::TimeZone>(now: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let separator = "=".repeat(80);
    format!(
        "\n\n{}\n=== New Session Started at {} ===\n{}\n",
        separator,
        now.format("%Y-%m-%d %H:%M:%S"),
        separator
    )
}
