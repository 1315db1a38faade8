use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::Settings;

/// Must be kept alive for the lifetime of the process; dropping it stops the
/// non-blocking file writer's flush thread.
pub struct LoggingGuard {
    _query_log_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Sets up two independent `tracing` sinks, mirroring the original's two-logger
/// `dictConfig`:
///
/// - a stdout `fmt` layer gated by `RUST_LOG` (falling back to
///   `Settings::stream_log_level` if `RUST_LOG` is unset) for everything;
/// - a non-blocking file layer that only ever receives events logged against the
///   `sql_queries` target (every query a `DatabaseSession` runs), writing to
///   `Settings::queries_log_filename`, independent of the stdout filter.
pub fn init_tracing(settings: &Settings) -> LoggingGuard {
    let base_directive = std::env::var("RUST_LOG").unwrap_or_else(|_| settings.stream_log_level.clone());
    // `sql_queries` events go to their own file only, not stdout — the original's
    // loggers are configured with `propagate: False` for exactly this reason.
    let stdout_filter = EnvFilter::new(format!("{base_directive},sql_queries=off"));
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(stdout_filter);

    let query_log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.queries_log_filename)
        .unwrap_or_else(|error| panic!("failed to open {}: {error}", settings.queries_log_filename));
    let (non_blocking, guard) = tracing_appender::non_blocking(query_log_file);
    let query_log_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking.with_max_level(tracing::Level::INFO))
        .with_ansi(false)
        .with_target(false)
        .with_filter(Targets::new().with_target("sql_queries", tracing::Level::INFO));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(query_log_layer)
        .init();

    LoggingGuard {
        _query_log_guard: guard,
    }
}
