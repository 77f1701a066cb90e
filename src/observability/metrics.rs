//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): requests by method, status
//! - `forwarder_request_duration_seconds` (histogram): time to response head
//! - `forwarder_upstream_errors_total` (counter): failed upstream fetches
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "forwarder_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "forwarder_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    ::metrics::counter!("forwarder_upstream_errors_total").increment(1);
}
