//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feature_requests_total` (counter): requests by outcome
//! - `feature_request_duration_seconds` (histogram): end-to-end latency
//! - `upstream_fetch_duration_seconds` (histogram): per-upstream latency
//! - `upstream_fetch_failures_total` (counter): failed fetches by upstream
//! - `feature_cache_events_total` (counter): cache hits and misses
//! - `frequency_entries` (gauge): size of the loaded frequency table
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::upstream::Upstream;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record a finished feature request.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("feature_requests_total", "outcome" => outcome).increment(1);
    histogram!("feature_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a finished upstream fetch.
pub fn record_fetch(upstream: Upstream, start: Instant, success: bool) {
    histogram!("upstream_fetch_duration_seconds", "upstream" => upstream.as_str())
        .record(start.elapsed().as_secs_f64());
    if !success {
        counter!("upstream_fetch_failures_total", "upstream" => upstream.as_str()).increment(1);
    }
}

/// Record a cache lookup (`hit` or `miss`).
pub fn record_cache_event(event: &'static str) {
    counter!("feature_cache_events_total", "event" => event).increment(1);
}

pub fn record_frequency_entries(entries: usize) {
    gauge!("frequency_entries").set(entries as f64);
}
