//! Logging setup for the command line.
//!
//! Logs go to stderr so that command output on stdout stays machine-readable.

use std::io;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format for interactive use.
    Pretty,
    /// JSON format for log aggregation.
    Json,
}

impl LogFormat {
    /// Determines log format from the `LOG_FORMAT` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    /// Maps a `LOG_FORMAT` value to a format:
    /// - `json` (any case) => JSON format
    /// - anything else, or unset => Pretty format
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Initializes structured logging.
///
/// # Environment Variables
///
/// - `LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
/// - `RUST_LOG`: Log level filter (default: `info`)
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}
