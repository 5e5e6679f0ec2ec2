//! Telemetry and Observability
//!
//! Structured logging via `tracing-subscriber`: pretty-printed output in
//! debug builds, JSON in release builds. A `RUST_LOG` environment variable
//! overrides the configured level.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with the given log level from config.
pub fn init(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if cfg!(debug_assertions) {
        builder.pretty().with_target(false).try_init().ok();
    } else {
        builder.json().try_init().ok();
    }
}
