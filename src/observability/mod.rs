//! Structured logging for ledgerfile
//!
//! Library code emits `tracing` events only; installing a subscriber is the
//! binary's job. [`init_logging`] installs one JSON-lines subscriber on
//! stderr so stdout stays reserved for command responses.
//!
//! Event conventions:
//! - `debug!` for reads and lookups
//! - `info!` for every mutation of a record file
//! - fields carry `kind`, `key`/`iban`, `offset`, `len` where known

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Builds the filter: `RUST_LOG` wins, then `level`, then `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), level)
}

fn filter_from(env: Option<&str>, level: &str) -> EnvFilter {
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global JSON subscriber. Later calls are no-ops.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(false),
        )
        .with(env_filter(level))
        .try_init()
        .ok();
}
