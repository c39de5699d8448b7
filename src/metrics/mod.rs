//! # Metrics Collection Module
//!
//! Prometheus export for request, error and health metrics.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `ocr_requests_total{backend, status}` - Backend calls by outcome
//! - `ocr_errors_total{backend, error_kind}` - Failed calls by error kind
//!
//! **Histograms:**
//! - `ocr_request_duration_seconds{backend}` - OCR call duration
//! - `ocr_probe_latency_seconds{backend}` - Liveness probe latency
//!
//! **Gauges:**
//! - `ocr_backends_total` - Registered backends
//! - `ocr_backends_healthy` - Backends currently Healthy
//! - `ocr_backend_up{backend}` - 1 when the backend is routable, else 0

pub mod handler;

use crate::health::{HealthStatus, HealthTable};
use crate::registry::Registry;
use std::sync::Arc;
use std::time::Instant;

/// Computes fleet gauges and renders the Prometheus text.
pub struct MetricsCollector {
    registry: Arc<Registry>,
    health: HealthTable,
    /// Orchestrator startup time for uptime calculation
    start_time: Instant,
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        registry: Arc<Registry>,
        health: HealthTable,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            registry,
            health,
            start_time,
            prometheus_handle,
        }
    }

    /// Update fleet state gauges from the published health snapshots.
    pub fn update_fleet_gauges(&self) {
        let snapshot = self.health.snapshot(&self.registry);

        metrics::gauge!("ocr_backends_total").set(snapshot.len() as f64);

        let healthy = snapshot
            .iter()
            .filter(|(_, s)| s.status == HealthStatus::Healthy)
            .count();
        metrics::gauge!("ocr_backends_healthy").set(healthy as f64);

        for (id, state) in &snapshot {
            let up = if state.status.is_routable() { 1.0 } else { 0.0 };
            metrics::gauge!("ocr_backend_up", "backend" => id.clone()).set(up);
        }
    }

    /// Uptime in seconds since startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize Prometheus metrics exporter with custom histogram buckets.
///
/// OCR calls on a GPU take seconds to minutes, so duration buckets run up to
/// the default 120s OCR timeout and beyond. Probe buckets stay sub-10s.
///
/// Returns a PrometheusHandle that can be used to render metrics.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let duration_buckets = &[0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0, 300.0];
    let probe_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("ocr_request_duration_seconds".to_string()),
            duration_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("ocr_probe_latency_seconds".to_string()),
            probe_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Handle for a recorder that is not installed globally.
///
/// Used when a global recorder already exists (tests, repeated setup) so the
/// `/metrics` endpoint still renders.
pub fn detached_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle()
}
