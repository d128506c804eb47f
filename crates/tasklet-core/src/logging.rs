//! Structured logging with `tracing`.
//!
//! Every crate logs through `tracing` macros with structured fields. The
//! binary installs one global `fmt` subscriber on stderr at startup via
//! [`init_subscriber`]. `RUST_LOG`, when set, takes precedence over the
//! configured level.

use tracing_subscriber::EnvFilter;

/// Level used when neither the caller nor `RUST_LOG` provides one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter for `level`, letting `RUST_LOG` override it.
///
/// An unparseable `level` falls back to [`DEFAULT_LEVEL`].
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display, e.g. `"info"` or
///   `"tasklet_repository=debug"`.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
