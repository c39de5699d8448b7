//! Error types for backend transport operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a backend over HTTP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request exceeded its deadline.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Connection could not be established (refused, DNS, reset).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Request could not be sent or was rejected mid-flight.
    #[error("request failed: {0}")]
    Request(String),

    /// Response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Outgoing request could not be built (e.g. invalid content type).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl TransportError {
    /// Classify a reqwest error. `timeout` is reported back for timeouts.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "request timed out after 120s");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_connect_display() {
        let err = TransportError::Connect("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
        assert!(!err.is_timeout());
    }
}
