use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route `tracing` output to a daily rotating file under `log_dir`.
///
/// There is no console layer: the TUI owns the terminal. Levels come from
/// `RUST_LOG`, defaulting to `info` everywhere and `debug` for this crate.
/// The returned guard flushes the file writer on drop, so keep it alive for
/// the whole run.
pub fn setup_logging(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "score-tracker.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let default_filter = "info,score_tracker=debug";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    guard
}
