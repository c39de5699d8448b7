//! Request Router.
//!
//! Resolves the requested backend, gates on its published health, forwards
//! the upload through the transport and normalizes the reply. In compare
//! mode the same pipeline runs against every registered backend at once.
//! The router never retries and never falls back to a different backend.

pub mod error;
pub mod request;


pub use error::{ErrorKind, RoutingError};
pub use request::{BackendSelector, OcrRequest, PageSelection, PayloadKind, RequestError};

use crate::config::RoutingConfig;
use crate::health::HealthTable;
use crate::normalize::{NormalizeError, Normalizer, UnifiedResult};
use crate::registry::{BackendDescriptor, Registry};
use crate::transport::{BackendReply, OcrTransport, TransportError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Backend selector value that fans a request out to every backend.
pub const COMPARE_ALL: &str = "compare-all";

/// Selector values that mean compare mode, matched case-insensitively.
pub const COMPARE_ALIASES: [&str; 3] = [COMPARE_ALL, "compare", "all"];

/// Whether `value` selects compare mode. Such values can never be backend ids.
pub fn is_compare_sentinel(value: &str) -> bool {
    let value = value.trim();
    COMPARE_ALIASES
        .iter()
        .any(|alias| value.eq_ignore_ascii_case(alias))
}

const ERROR_EXCERPT_CHARS: usize = 200;

/// What a routed request produced.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Single(UnifiedResult),
    Compare(CompareResults),
}

/// One result per registered backend, in registry order.
///
/// Serializes as a JSON object keyed by backend id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareResults {
    entries: Vec<UnifiedResult>,
}

impl CompareResults {
    pub fn get(&self, backend_id: &str) -> Option<&UnifiedResult> {
        self.entries.iter().find(|r| r.backend_id == backend_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnifiedResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|r| r.success).count()
    }
}

impl Serialize for CompareResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.backend_id, entry)?;
        }
        map.end()
    }
}

/// Routes OCR requests to backends.
pub struct Router {
    registry: Arc<Registry>,
    health: HealthTable,
    transport: Arc<dyn OcrTransport>,
    normalizer: Normalizer,
    ocr_timeout: Duration,
}

impl Router {
    pub fn new(
        registry: Arc<Registry>,
        health: HealthTable,
        transport: Arc<dyn OcrTransport>,
        config: &RoutingConfig,
    ) -> Self {
        let normalizer = Normalizer::from_registry(&registry);
        Self {
            registry,
            health,
            transport,
            normalizer,
            ocr_timeout: Duration::from_secs(config.ocr_timeout_seconds),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch on the request's selector.
    ///
    /// Compare mode never fails as a whole; per-backend failures are carried
    /// inside [`CompareResults`].
    pub async fn route(&self, request: &OcrRequest) -> Result<RouteOutcome, RoutingError> {
        match &request.selector {
            BackendSelector::Single(id) => {
                self.route_single(id, request).await.map(RouteOutcome::Single)
            }
            BackendSelector::CompareAll => Ok(RouteOutcome::Compare(self.route_compare(request).await)),
        }
    }

    /// Send the request to exactly one backend.
    ///
    /// # Errors
    ///
    /// `UnknownBackend` and `UnsupportedPayload` are returned before any
    /// network activity. `BackendUnavailable` is returned without a call when
    /// the backend is currently Unhealthy.
    pub async fn route_single(
        &self,
        backend_id: &str,
        request: &OcrRequest,
    ) -> Result<UnifiedResult, RoutingError> {
        let backend = self
            .registry
            .get(backend_id)
            .map_err(|_| RoutingError::UnknownBackend {
                id: backend_id.to_string(),
            })?;

        let start = Instant::now();
        let result = self.dispatch(backend, request).await;
        record_outcome(&backend.id, &result, start.elapsed());
        result
    }

    /// Send the request to every registered backend concurrently.
    ///
    /// Returns once every call has completed or timed out.
    pub async fn route_compare(&self, request: &OcrRequest) -> CompareResults {
        let calls = self.registry.list().iter().map(|backend| async move {
            let start = Instant::now();
            let result = self.dispatch(backend, request).await;
            let elapsed = start.elapsed();
            record_outcome(&backend.id, &result, elapsed);

            result.unwrap_or_else(|error| {
                UnifiedResult::failure(&backend.id, &error, &request.file_name, request.kind, elapsed)
            })
        });

        let entries = futures::future::join_all(calls).await;

        tracing::info!(
            backends = entries.len(),
            succeeded = entries.iter().filter(|r| r.success).count(),
            file_name = %request.file_name,
            "Compare request completed"
        );

        CompareResults { entries }
    }

    /// Capability gate, health gate, forward, normalize.
    async fn dispatch(
        &self,
        backend: &BackendDescriptor,
        request: &OcrRequest,
    ) -> Result<UnifiedResult, RoutingError> {
        if !backend.supports(request.kind) {
            return Err(RoutingError::UnsupportedPayload {
                id: backend.id.clone(),
                kind: request.kind,
            });
        }

        if let Some(state) = self.health.current_status(&backend.id) {
            if !state.status.is_routable() {
                return Err(RoutingError::BackendUnavailable {
                    id: backend.id.clone(),
                    last_error: state.last_error,
                });
            }
        }

        let start = Instant::now();
        let reply = match tokio::time::timeout(
            self.ocr_timeout,
            self.transport.forward(backend, request, self.ocr_timeout),
        )
        .await
        {
            Err(_) | Ok(Err(TransportError::Timeout(_))) => {
                return Err(RoutingError::BackendTimeout {
                    id: backend.id.clone(),
                    timeout_seconds: self.ocr_timeout.as_secs(),
                })
            }
            Ok(Err(e)) => {
                return Err(RoutingError::BackendError {
                    id: backend.id.clone(),
                    status: None,
                    message: e.to_string(),
                })
            }
            Ok(Ok(reply)) => reply,
        };

        if !reply.is_success() {
            return Err(RoutingError::BackendError {
                id: backend.id.clone(),
                status: Some(reply.status),
                message: error_excerpt(&reply),
            });
        }

        let body = self
            .normalizer
            .normalize(&backend.id, &reply.body)
            .map_err(|e| match e {
                NormalizeError::BackendFailure(message) => RoutingError::BackendError {
                    id: backend.id.clone(),
                    status: Some(reply.status),
                    message,
                },
                other => RoutingError::MalformedBackendResponse {
                    id: backend.id.clone(),
                    message: other.to_string(),
                },
            })?;

        Ok(UnifiedResult::from_normalized(
            &backend.id,
            body,
            &request.file_name,
            request.kind,
            start.elapsed(),
        ))
    }
}

/// Short description of a non-2xx reply: the JSON `error` field when the
/// backend sent one, otherwise the start of the body.
fn error_excerpt(reply: &BackendReply) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(&reply.body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

    let detail = from_json.unwrap_or_else(|| {
        let body = reply.body.trim();
        if body.chars().count() > ERROR_EXCERPT_CHARS {
            let cut: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            format!("{cut}...")
        } else {
            body.to_string()
        }
    });

    if detail.is_empty() {
        format!("HTTP {}", reply.status)
    } else {
        format!("HTTP {}: {}", reply.status, detail)
    }
}

fn record_outcome(backend_id: &str, result: &Result<UnifiedResult, RoutingError>, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis() as u64;
    metrics::histogram!("ocr_request_duration_seconds", "backend" => backend_id.to_string())
        .record(elapsed.as_secs_f64());

    match result {
        Ok(_) => {
            metrics::counter!("ocr_requests_total",
                "backend" => backend_id.to_string(),
                "status" => "success"
            )
            .increment(1);
            tracing::info!(backend_id, elapsed_ms, "OCR request succeeded");
        }
        Err(error) => {
            metrics::counter!("ocr_requests_total",
                "backend" => backend_id.to_string(),
                "status" => "error"
            )
            .increment(1);
            metrics::counter!("ocr_errors_total",
                "backend" => backend_id.to_string(),
                "error_kind" => error.kind().as_str()
            )
            .increment(1);
            tracing::warn!(
                backend_id,
                error_kind = %error.kind(),
                elapsed_ms,
                error = %error,
                "OCR request failed"
            );
        }
    }
}
