//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count dispatch outcomes and time each dispatch
//! - Expose a Prometheus-compatible scrape endpoint
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome, status
//! - `router_dispatch_duration_seconds` (histogram): dispatch latency by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The exporter is optional and started by the binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const DISPATCH_TOTAL: &str = "router_dispatch_total";
pub const DISPATCH_DURATION: &str = "router_dispatch_duration_seconds";

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!(DISPATCH_TOTAL, "Requests dispatched through the route table");
    ::metrics::describe_histogram!(DISPATCH_DURATION, "Time spent matching, handling and encoding");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(DISPATCH_TOTAL, "outcome" => outcome, "status" => status.to_string()).increment(1);
    ::metrics::histogram!(DISPATCH_DURATION, "outcome" => outcome).record(start.elapsed().as_secs_f64());
}
