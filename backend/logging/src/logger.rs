//! Structured Logger
//!
//! Console output always; daily-rolling NDJSON files when a log directory is set.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init_logger(level: &str, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Writes `<log_dir>/expertdesk.log.YYYY-MM-DD`
    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "expertdesk.log");
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
