//! Health monitoring for OCR backends.
//!
//! A background task probes every registered backend on a fixed interval and
//! publishes debounced [`HealthState`] snapshots into a shared [`HealthTable`].
//! Request handling never probes; it only reads the latest snapshot.

mod config;
mod error;
mod parser;
mod state;
mod table;


pub use config::*;
pub use error::*;
pub use parser::{parse_health_report, HealthReport};
pub use state::*;
pub use table::HealthTable;

use crate::registry::{BackendDescriptor, Registry};
use crate::transport::OcrTransport;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Background service that periodically probes backend health.
pub struct HealthMonitor {
    registry: Arc<Registry>,
    transport: Arc<dyn OcrTransport>,
    config: HealthCheckConfig,
    table: HealthTable,
}

impl HealthMonitor {
    /// Create a monitor with every backend seeded as `Unknown`.
    pub fn new(
        registry: Arc<Registry>,
        config: HealthCheckConfig,
        transport: Arc<dyn OcrTransport>,
    ) -> Self {
        let table = HealthTable::for_registry(&registry);
        Self {
            registry,
            transport,
            config,
            table,
        }
    }

    /// Handle to the published snapshots. Hand this to readers.
    pub fn table(&self) -> HealthTable {
        self.table.clone()
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Probe one backend once. Never touches the table.
    pub async fn check_backend(&self, backend: &BackendDescriptor) -> ProbeResult {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let start = Instant::now();

        let reply = match tokio::time::timeout(timeout, self.transport.probe(backend, timeout)).await
        {
            Err(_) => {
                return ProbeResult::Failure {
                    error: HealthCheckError::Timeout(self.config.timeout_seconds),
                }
            }
            Ok(Err(e)) => {
                return ProbeResult::Failure {
                    error: HealthCheckError::from_transport(e, self.config.timeout_seconds),
                }
            }
            Ok(Ok(reply)) => reply,
        };

        let latency_ms = start.elapsed().as_millis() as u32;
        metrics::histogram!("ocr_probe_latency_seconds",
            "backend" => backend.id.clone()
        )
        .record(latency_ms as f64 / 1000.0);

        if !reply.is_success() {
            return ProbeResult::Failure {
                error: HealthCheckError::HttpError(reply.status),
            };
        }

        match parse_health_report(&reply.body) {
            Ok(report) if report.is_ready() => ProbeResult::Success { latency_ms, report },
            Ok(report) => ProbeResult::Failure {
                error: HealthCheckError::NotReady(report.not_ready_reason()),
            },
            Err(error) => ProbeResult::Failure { error },
        }
    }

    /// Fold a probe result into the backend's snapshot and publish it.
    ///
    /// Returns the published snapshot.
    pub fn apply_result(&self, backend_id: &str, result: &ProbeResult) -> HealthState {
        let previous = self.table.current_status(backend_id).unwrap_or_default();
        let next = previous.apply(result, &self.config, chrono::Utc::now());

        if next.status != previous.status {
            tracing::info!(
                backend_id = backend_id,
                old_status = ?previous.status,
                new_status = ?next.status,
                error = next.last_error.as_deref().unwrap_or(""),
                "Backend status changed"
            );
        }
        if let ProbeResult::Failure { error } = result {
            tracing::debug!(backend_id = backend_id, error = %error, "Health probe failed");
        }

        self.table.publish(backend_id, next.clone());
        next
    }

    /// Probe all registered backends concurrently.
    ///
    /// Each result is published as soon as its own probe finishes, so a stalled
    /// backend never holds back the others. Results come back in registry order.
    pub async fn check_all_backends(&self) -> Vec<(String, ProbeResult)> {
        let probes = self.registry.list().iter().map(|backend| async move {
            let result = self.check_backend(backend).await;
            self.apply_result(&backend.id, &result);
            (backend.id.clone(), result)
        });

        futures::future::join_all(probes).await
    }

    /// Start the monitor background task.
    /// Returns a JoinHandle that resolves when the monitor stops.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds.max(1)));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                backends = self.registry.len(),
                "Health monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let results = self.check_all_backends().await;
                        tracing::debug!(
                            backends_checked = results.len(),
                            "Health check cycle completed"
                        );
                    }
                }
            }
        })
    }
}
