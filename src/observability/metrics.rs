//! Metrics collection and exposition.
//!
//! # Metrics
//! - `routify_requests_total` (counter): requests by method, status, route
//! - `routify_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Route label is the registered pattern (bounded cardinality), `none` when unmatched

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, route: &str, start_time: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    let route = route.to_string();

    counter!(
        "routify_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "route" => route.clone()
    )
    .increment(1);
    histogram!(
        "routify_request_duration_seconds",
        "method" => method,
        "status" => status,
        "route" => route
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
