use std::io;

use tracing::dispatcher::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, registry};

use crate::parking::config::{Config, Logging};

// Helper struct to store the logger guards. When they are dropped, logging is
// reset and the non blocking writer flushes its remaining lines.
#[allow(dead_code)]
pub struct LogGuards {
    log_guard: Option<WorkerGuard>,
    default: DefaultGuard,
}

/// Sets up tracing for the current thread. Warnings and errors go to stderr,
/// so the rendered output on stdout stays machine readable. With
/// `output.logging: Info` all operations are additionally written as JSON
/// lines to `rust_park_log.txt` in the output directory.
pub fn init_logging(config: &Config) -> LogGuards {
    let (log_layer, log_guard) = if Logging::Info == config.output.logging {
        let dir = &config.output.output_dir;
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create output directory {:?}: {}", dir, e));
        let log_file_appender = rolling::never(dir, "rust_park_log.txt");
        let (log_file, log_guard) = non_blocking(log_file_appender);
        let layer = fmt::Layer::new()
            .with_writer(log_file)
            .json()
            .with_ansi(false)
            .with_filter(LevelFilter::INFO);
        (Some(layer), Some(log_guard))
    } else {
        (None, None)
    };

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(LevelFilter::WARN);

    // Add `Optional`s. If None, then the corresponding layer is not added.
    let collector = registry().with(log_layer).with(console_layer);

    let default = tracing::subscriber::set_default(collector);

    LogGuards { log_guard, default }
}
