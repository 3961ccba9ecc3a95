//! Metrics collection and exposition.
//!
//! # Metrics
//! - `order_proxy_requests_total` (counter): inbound proxy calls by outcome
//! - `order_proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `order_proxy_attempts_total` (counter): upstream attempts by result
//! - `catalog_lookups_total` (counter): lookups by table and hit/miss
//!
//! Recording is a no-op until an exporter is installed.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_proxy_request(outcome: &'static str, start_time: Instant) {
    counter!("order_proxy_requests_total", "outcome" => outcome).increment(1);
    histogram!("order_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_attempt(result: &'static str) {
    counter!("order_proxy_attempts_total", "result" => result).increment(1);
}

pub fn record_lookup(table: &'static str, found: bool) {
    let result = if found { "hit" } else { "miss" };
    counter!("catalog_lookups_total", "table" => table, "result" => result).increment(1);
}
