//! Process metrics collection and exposition.
//!
//! These are local counters for operators scraping the process. They are
//! separate from the page-view samples published to the metrics sink.
//!
//! # Metrics
//! - `helloworld_requests_total` (counter): requests by method
//! - `helloworld_telemetry_submissions_total` (counter): by kind, outcome
//! - `helloworld_log_records_dropped_total` (counter): stream queue overflow
//! - `helloworld_log_records_shipped_total` (counter): records by delivery outcome
//! - `helloworld_log_flush_duration_seconds` (histogram): batch delivery time
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &Method) {
    ::metrics::counter!("helloworld_requests_total", "method" => method.as_str().to_owned())
        .increment(1);
}

/// `kind` is "event" or "metric"; `outcome` is "success" or "failure".
pub fn record_submission(kind: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "helloworld_telemetry_submissions_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_log_dropped() {
    ::metrics::counter!("helloworld_log_records_dropped_total").increment(1);
}

/// `outcome` is "success", "failure" or "timeout".
pub fn record_log_flush(start: Instant, records: usize, outcome: &'static str) {
    ::metrics::histogram!("helloworld_log_flush_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
    ::metrics::counter!("helloworld_log_records_shipped_total", "outcome" => outcome)
        .increment(records as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_flush_is_counted_by_outcome() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            record_log_flush(Instant::now(), 2, "success");
            record_log_flush(Instant::now(), 3, "failure");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"helloworld_log_records_shipped_total{outcome="success"} 2"#));
        assert!(rendered.contains(r#"helloworld_log_records_shipped_total{outcome="failure"} 3"#));
    }
}
