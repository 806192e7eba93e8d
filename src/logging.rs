//! Logging setup.
//!
//! Diagnostics go to stderr so the result grid on stdout stays clean. The
//! filter comes from `PLAN_CHECK_LOG` (any `EnvFilter` directive), defaulting
//! to `warn`. When a log directory is configured, INFO+ events are also
//! appended to `plan-check.log` there.

use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub const LOG_ENV: &str = "PLAN_CHECK_LOG";
pub const LOG_FILE_NAME: &str = "plan-check.log";

fn stderr_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize logging.
///
/// Returns the file writer guard when file logging is active; it must be held
/// until exit so buffered lines are flushed. Falls back to stderr only if the
/// log directory cannot be created.
pub fn init(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_filter(stderr_filter());

    let Some(dir) = log_dir else {
        let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        // Subscriber not installed yet
        eprintln!("Failed to create log directory {:?}: {}, using stderr only", dir, e);
        let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    tracing::info!(log_file = ?dir.join(LOG_FILE_NAME), "plan-check logging initialized");

    Some(guard)
}
