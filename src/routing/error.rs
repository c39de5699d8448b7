//! Error types for routing failures

use crate::routing::PayloadKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable classification carried on failed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownBackend,
    UnsupportedPayload,
    BackendUnavailable,
    BackendTimeout,
    BackendError,
    MalformedBackendResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownBackend => "UnknownBackend",
            ErrorKind::UnsupportedPayload => "UnsupportedPayload",
            ErrorKind::BackendUnavailable => "BackendUnavailable",
            ErrorKind::BackendTimeout => "BackendTimeout",
            ErrorKind::BackendError => "BackendError",
            ErrorKind::MalformedBackendResponse => "MalformedBackendResponse",
        }
    }

    /// HTTP status used when this failure ends a single-backend request.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::UnknownBackend | ErrorKind::UnsupportedPayload => 400,
            ErrorKind::BackendUnavailable => 503,
            ErrorKind::BackendTimeout => 504,
            ErrorKind::BackendError => 502,
            ErrorKind::MalformedBackendResponse => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while routing a request to a backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The requested id is not in the registry
    #[error("unknown backend '{id}'")]
    UnknownBackend { id: String },

    /// The backend does not accept this payload kind
    #[error("backend '{id}' does not support {kind} uploads")]
    UnsupportedPayload { id: String, kind: PayloadKind },

    /// The health monitor has marked the backend unhealthy
    #[error("backend '{id}' is unavailable{}", last_error.as_deref().map(|e| format!(": {e}")).unwrap_or_default())]
    BackendUnavailable {
        id: String,
        last_error: Option<String>,
    },

    /// The backend did not answer within the OCR timeout
    #[error("backend '{id}' timed out after {timeout_seconds}s")]
    BackendTimeout { id: String, timeout_seconds: u64 },

    /// Transport failure, non-2xx reply, or an explicit failure from the backend
    #[error("backend '{id}' failed: {message}")]
    BackendError {
        id: String,
        status: Option<u16>,
        message: String,
    },

    /// The backend answered 2xx but the body could not be normalized
    #[error("backend '{id}' returned a malformed response: {message}")]
    MalformedBackendResponse { id: String, message: String },
}

impl RoutingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::UnknownBackend { .. } => ErrorKind::UnknownBackend,
            RoutingError::UnsupportedPayload { .. } => ErrorKind::UnsupportedPayload,
            RoutingError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            RoutingError::BackendTimeout { .. } => ErrorKind::BackendTimeout,
            RoutingError::BackendError { .. } => ErrorKind::BackendError,
            RoutingError::MalformedBackendResponse { .. } => ErrorKind::MalformedBackendResponse,
        }
    }

    pub fn backend_id(&self) -> &str {
        match self {
            RoutingError::UnknownBackend { id }
            | RoutingError::UnsupportedPayload { id, .. }
            | RoutingError::BackendUnavailable { id, .. }
            | RoutingError::BackendTimeout { id, .. }
            | RoutingError::BackendError { id, .. }
            | RoutingError::MalformedBackendResponse { id, .. } => id,
        }
    }
}
