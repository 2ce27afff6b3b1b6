//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/screen-overlay/screen-overlay.log` (or platform
//! equivalent) with 10 MB size-based rotation. Stderr only shows warnings so
//! the interactive menu stays readable. Set `DEBUG_LOGGING=1` to enable debug
//! output for the screen-overlay crates.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str =
    "info,screen_overlay=debug,screen_overlay_core=debug,screen_overlay_window=debug";

fn file_directive(debug_logging: bool) -> &'static str {
    if debug_logging { DEBUG_DIRECTIVE } else { "info" }
}

fn stderr_directive(debug_logging: bool) -> &'static str {
    if debug_logging { DEBUG_DIRECTIVE } else { "warn" }
}

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that MUST be held for the application lifetime
/// to ensure all buffered logs are flushed on shutdown.
///
/// # Fallback
/// If the log directory or file cannot be created, returns `None` and falls
/// back to stderr-only logging.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("screen-overlay"),
        None => {
            init_stderr_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    // Size-based rolling file appender (10 MB, keep 1 rotated file)
    let log_path = log_dir.join("screen-overlay.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(file_directive(debug_logging)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(stderr_directive(debug_logging)));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(
        log_file = ?log_path,
        debug_logging,
        "Screen overlay logging initialized"
    );

    Some(guard)
}

/// Fallback: Initialize stderr-only logging when file logging fails.
fn init_stderr_only(debug_logging: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(stderr_directive(debug_logging)))
        .init();

    tracing::debug!(debug_logging, "Screen overlay logging initialized (stderr only)");
}
