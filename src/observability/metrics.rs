//! Metrics collection and exposition.
//!
//! # Metrics
//! - `urlshort_resolutions_total` (counter): chain level outcomes by source,
//!   `outcome` is `redirect` or `fallthrough`
//! - `urlshort_lookup_errors_total` (counter): store lookups that failed and
//!   were treated as a miss
//! - `urlshort_rules_loaded` (gauge): rules held by each in-memory source
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The exporter serves Prometheus text on its own listener

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(source: &str, outcome: &'static str) {
    counter!(
        "urlshort_resolutions_total",
        "source" => source.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_lookup_error(source: &str) {
    counter!("urlshort_lookup_errors_total", "source" => source.to_string()).increment(1);
}

pub fn record_rules_loaded(source: &str, count: usize) {
    gauge!("urlshort_rules_loaded", "source" => source.to_string()).set(count as f64);
}
