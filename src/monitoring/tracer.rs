/*!
 * Tracing Setup
 * Structured logging for list mutations and drain wake-ups
 */

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable enabling JSON output
pub const TRACE_JSON_ENV: &str = "LIST_TRACE_JSON";

/// Initialize the global tracing subscriber
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - LIST_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    match installed {
        Ok(()) => info!(json = use_json, "Structured tracing initialized"),
        Err(e) => debug!(error = %e, "Tracing subscriber already installed"),
    }
}
