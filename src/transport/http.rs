//! reqwest-backed transport.

use super::{BackendReply, OcrTransport, TransportError};
use crate::registry::BackendDescriptor;
use crate::routing::OcrRequest;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// HTTP transport with a shared, pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose connections give up after `connect_timeout`.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create a transport with a custom HTTP client (for testing).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the multipart body the backends expect: the file under a part
    /// named after the payload kind, plus optional `prompt` and `pages`.
    fn build_form(request: &OcrRequest) -> Result<Form, TransportError> {
        let part = Part::stream_with_length(request.payload.clone(), request.payload.len() as u64)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut form = Form::new().part(request.kind.as_str(), part);

        if let Some(prompt) = &request.prompt {
            form = form.text("prompt", prompt.clone());
        }
        if !request.pages.is_empty() {
            form = form.text("pages", request.pages.to_json());
        }

        Ok(form)
    }

    async fn read_reply(
        response: reqwest::Response,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;
        Ok(BackendReply { status, body })
    }
}

#[async_trait]
impl OcrTransport for HttpTransport {
    async fn probe(
        &self,
        backend: &BackendDescriptor,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        let response = self
            .client
            .get(backend.health_url())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;

        Self::read_reply(response, timeout).await
    }

    async fn forward(
        &self,
        backend: &BackendDescriptor,
        request: &OcrRequest,
        timeout: Duration,
    ) -> Result<BackendReply, TransportError> {
        let url = backend.ocr_url(request.kind);
        let form = Self::build_form(request)?;

        tracing::debug!(
            backend_id = %backend.id,
            url = %url,
            bytes = request.payload.len(),
            "Forwarding OCR upload"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;

        Self::read_reply(response, timeout).await
    }
}
