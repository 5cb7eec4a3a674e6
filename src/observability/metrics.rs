//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tx_parser_crawl_cycles_total` (counter): cycles by outcome (indexed, duplicate, failed)
//! - `tx_parser_crawl_duration_seconds` (histogram): cycle latency
//! - `tx_parser_crawl_skipped_ticks_total` (counter): ticks dropped while a cycle was in flight
//! - `tx_parser_crawl_panics_total` (counter): cycle tasks that panicked
//! - `tx_parser_current_block` (gauge): last processed block
//! - `tx_parser_matched_transactions_total` (counter): transactions indexed
//! - `tx_parser_subscribed_addresses` (gauge): subscription count
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_crawl(outcome: &'static str, start: Instant) {
    ::metrics::counter!("tx_parser_crawl_cycles_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("tx_parser_crawl_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_skipped_tick() {
    ::metrics::counter!("tx_parser_crawl_skipped_ticks_total").increment(1);
}

pub fn record_crawl_panic() {
    ::metrics::counter!("tx_parser_crawl_panics_total").increment(1);
}

pub fn record_current_block(block: u64) {
    ::metrics::gauge!("tx_parser_current_block").set(block as f64);
}

pub fn record_matched_transactions(count: usize) {
    ::metrics::counter!("tx_parser_matched_transactions_total").increment(count as u64);
}

pub fn record_subscriptions(count: usize) {
    ::metrics::gauge!("tx_parser_subscribed_addresses").set(count as f64);
}
