//! Error types for health checking.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur during a liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthCheckError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Body is not a recognizable health report
    #[error("invalid response: {0}")]
    ParseError(String),

    /// Backend answered but reports it cannot serve (model not loaded, no GPU)
    #[error("backend not ready: {0}")]
    NotReady(String),
}

impl HealthCheckError {
    /// Map a transport failure into a probe failure.
    pub fn from_transport(e: TransportError, timeout_seconds: u64) -> Self {
        match e {
            TransportError::Timeout(_) => HealthCheckError::Timeout(timeout_seconds),
            TransportError::Body(msg) => HealthCheckError::ParseError(msg),
            other => HealthCheckError::ConnectionFailed(other.to_string()),
        }
    }
}
