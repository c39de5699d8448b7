//! Backend transport abstraction.
//!
//! The `OcrTransport` trait is the only place the orchestrator talks to a
//! backend over the network. Both the health monitor (liveness probes) and the
//! request router (OCR forwarding) go through it, which keeps HTTP details in
//! one module and lets tests count or stall outbound calls.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;

use crate::registry::BackendDescriptor;
use crate::routing::OcrRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Raw HTTP reply from a backend: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
}

impl BackendReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam between the orchestrator and its backends.
///
/// # Object Safety
///
/// Designed to be used as `Arc<dyn OcrTransport>`. All async methods use
/// `async_trait` for compatibility with trait objects.
///
/// # Cancellation Safety
///
/// Dropping a returned future aborts the in-flight HTTP request. Callers
/// rely on this to enforce their own deadlines with `tokio::time::timeout`.
#[async_trait]
pub trait OcrTransport: Send + Sync + 'static {
    /// Issue one liveness request against the backend's health endpoint.
    async fn probe(
        &self,
        backend: &BackendDescriptor,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError>;

    /// Forward an OCR upload to the backend endpoint matching its payload kind.
    async fn forward(
        &self,
        backend: &BackendDescriptor,
        request: &OcrRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError>;
}
