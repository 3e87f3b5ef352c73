//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status, outcome
//! - `proxy_request_duration_seconds` (histogram): handling latency by route
//! - `proxy_upstream_failures_total` (counter): failed fetches by kind
//! - `proxy_rewrites_total` (counter): markup passes by outcome (rewritten, fallback)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "proxy_requests_total",
        "route" => route,
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_failure(kind: &'static str) {
    ::metrics::counter!("proxy_upstream_failures_total", "kind" => kind).increment(1);
}

pub fn record_rewrite(outcome: &'static str) {
    ::metrics::counter!("proxy_rewrites_total", "outcome" => outcome).increment(1);
}
