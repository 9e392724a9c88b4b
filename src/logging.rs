//! File logging
//!
//! The TUI owns the terminal, so tracing output goes to a daily-rolling
//! file instead of stdout.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "pokecatch.log";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "pokecatch=info,warn";

/// Install the global subscriber writing to `<dir>/pokecatch.log.YYYY-MM-DD`.
///
/// Keep the returned guard alive until exit; dropping it flushes and stops
/// the background writer.
pub fn init_logging(dir: &Path) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}
