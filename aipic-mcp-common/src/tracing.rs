//! Tracing initialization for the aipic MCP server.
//!
//! Sets up the tracing subscriber with environment-based filtering via the
//! `RUST_LOG` environment variable, e.g.:
//!
//! - `RUST_LOG=debug` - debug logging for all modules
//! - `RUST_LOG=aipic_mcp_image=debug` - debug for the image crate only
//! - `RUST_LOG=warn,aipic_mcp_common=debug` - warn by default, debug for common
//!
//! The stdio transport shares stdout with the MCP protocol, so log output
//! goes to the default `tracing_subscriber` writer (stderr-safe formatting
//! is left to the subscriber configuration).

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Defaults to `info` when `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if called more than once, as the global subscriber can only be
/// set once per process.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer())
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Useful in tests where multiple entry points may race to install the
/// subscriber.
pub fn try_init_tracing() -> Result<(), ()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer())
        .try_init()
        .map_err(|_| ())
}

fn fmt_layer<S>() -> fmt::Layer<S> {
    fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
}
