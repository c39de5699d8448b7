//! Parsing of backend `/health` bodies.

use super::error::HealthCheckError;
use serde::{Deserialize, Serialize};

/// Liveness report returned by an OCR backend.
///
/// Backends answer `GET /health` with
/// `{"status": "healthy", "model_loaded": true, "gpu_available": true, "backend": "mineru"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub gpu_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl HealthReport {
    /// A backend is ready when it says it is healthy and its model is in memory.
    pub fn is_ready(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") && self.model_loaded
    }

    /// Short reason for a report that is not ready.
    pub fn not_ready_reason(&self) -> String {
        if !self.status.eq_ignore_ascii_case("healthy") {
            format!("status is '{}'", self.status)
        } else {
            "model not loaded".to_string()
        }
    }
}

/// Parse a `/health` body.
pub fn parse_health_report(body: &str) -> Result<HealthReport, HealthCheckError> {
    serde_json::from_str(body).map_err(|e| HealthCheckError::ParseError(e.to_string()))
}
