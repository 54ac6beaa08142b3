use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// Initialize the tracing subscriber.
///
/// Sets up:
/// - stderr layer: `RUST_LOG`, defaulting to "info", overridden by `-v`
///   (debug, then trace) and `-q` (off)
/// - file layer, only when `debug` is set: every event at debug level and
///   above, written to `rzls.log` in the temp directory with daily rotation
///
/// Returns a `WorkerGuard` that must be kept alive for the file logging to
/// work.
pub fn init_tracing(global: &GlobalArgs, debug: bool) -> Option<WorkerGuard> {
    let stderr_filter = if global.quiet {
        EnvFilter::new("off")
    } else {
        match global.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    let (file_layer, guard) = if debug {
        let file_appender = tracing_appender::rolling::daily(std::env::temp_dir(), "rzls.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new("debug"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    Registry::default().with(stderr_layer).with(file_layer).init();

    guard
}
