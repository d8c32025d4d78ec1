//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cascade_requests_total` (counter): dispatched requests by method, outcome
//! - `cascade_request_duration_seconds` (histogram): dispatch latency by method
//!
//! # Design Decisions
//! - The Prometheus exporter is only installed when enabled in config
//! - Without a recorder the macros are cheap no-ops, so tests need no setup

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::application::Outcome;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(method: &str, outcome: Outcome, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    ::metrics::counter!(
        "cascade_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    ::metrics::histogram!(
        "cascade_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed);
}
