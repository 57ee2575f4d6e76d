//! Tracing subscriber setup
//!
//! Human-readable output goes to stderr. When the data directory is
//! writable, JSON lines are also appended to the log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must be held until
/// the program exits. `None` means file logging is disabled.
pub fn init_logging(log_path: &Path) -> Option<WorkerGuard> {
    let (file_layer, guard) = match open_log_writer(log_path) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_writer(
    log_path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    // Logging is not set up yet, so a failure here can only be reported on stderr.
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("File logging disabled, cannot create {:?}: {}", dir, e);
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .inspect_err(|e| eprintln!("File logging disabled, cannot open {:?}: {}", log_path, e))
        .ok()?;

    Some(tracing_appender::non_blocking(appender))
}
