//! Shared test utilities for ocr-router integration tests.
//!
//! Mock OCR backends are wiremock servers answering `/health`, `/ocr/image`
//! and `/ocr/pdf` with the native body shapes of each backend family.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use ocr_router::api::{create_router, AppState};
use ocr_router::config::OrchestratorConfig;
use ocr_router::health::{HealthCheckConfig, HealthMonitor, HealthTable};
use ocr_router::registry::{BackendDescriptor, BackendFamily, Registry};
use ocr_router::transport::{HttpTransport, OcrTransport};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BOUNDARY: &str = "ocr-router-test-boundary";

/// Smallest valid PNG header, enough for a non-empty upload.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%test\n";

// =============================================================================
// Native backend bodies
// =============================================================================

pub fn ready_health_body() -> Value {
    json!({
        "status": "healthy",
        "model_loaded": true,
        "gpu_available": true,
        "timestamp": 1_700_000_000.0
    })
}

pub fn deepseek_image_body() -> Value {
    json!({
        "success": true,
        "backend": "deepseek-ocr",
        "raw_result": {
            "deepseek": "<|ref|>Total: 42.00<|/ref|><|det|>[[12,40,300,80]]<|/det|>",
            "mineru": {}
        },
        "markdown": "Total: 42.00",
        "source_markdown": "Total: 42.00",
        "boxes_image": "iVBORw0KGgo=",
        "processing_time": 1.3,
        "image_name": "receipt.png"
    })
}

pub fn mineru_image_body() -> Value {
    json!({
        "success": true,
        "backend": "mineru",
        "raw_result": {
            "deepseek": "",
            "mineru": {
                "middle_json": {"pdf_info": [{"page_idx": 0}]},
                "model_output": [],
                "metadata": {"backend": "pipeline"}
            }
        },
        "markdown": "Total: 42.00",
        "source_markdown": "",
        "boxes_image": "",
        "processing_time": 2.1
    })
}

// =============================================================================
// Mock servers
// =============================================================================

/// Mount a ready `/health` answer.
pub async fn mount_ready_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ready_health_body()))
        .mount(server)
        .await;
}

/// Mount a `/health` answer that always fails.
pub async fn mount_failing_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
}

/// Mount an OCR endpoint answering with `body`.
pub async fn mount_ocr(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A server that is ready and answers image OCR with `body`.
pub async fn ocr_backend(body: Value) -> MockServer {
    let server = MockServer::start().await;
    mount_ready_health(&server).await;
    mount_ocr(&server, "/ocr/image", body.clone()).await;
    mount_ocr(&server, "/ocr/pdf", body).await;
    server
}

// =============================================================================
// Registry, health and app builders
// =============================================================================

pub fn make_registry(backends: &[(&str, &str, BackendFamily)]) -> Arc<Registry> {
    let descriptors = backends
        .iter()
        .map(|(id, url, family)| BackendDescriptor::new(*id, *id, *url, *family))
        .collect();
    Arc::new(Registry::from_descriptors(descriptors).unwrap())
}

pub fn transport() -> Arc<dyn OcrTransport> {
    Arc::new(HttpTransport::new(Duration::from_secs(2)).unwrap())
}

/// Thresholds of 1 so one probe cycle settles every backend.
pub fn fast_health_config() -> HealthCheckConfig {
    HealthCheckConfig {
        enabled: true,
        interval_seconds: 1,
        timeout_seconds: 2,
        failure_threshold: 1,
        recovery_threshold: 1,
    }
}

/// Run one probe cycle and hand back the published table.
pub async fn probed_health(registry: &Arc<Registry>) -> HealthTable {
    let monitor = HealthMonitor::new(Arc::clone(registry), fast_health_config(), transport());
    monitor.check_all_backends().await;
    monitor.table()
}

pub fn test_config(ocr_timeout_seconds: u64) -> OrchestratorConfig {
    let mut config = OrchestratorConfig::default();
    config.routing.ocr_timeout_seconds = ocr_timeout_seconds;
    config
}

pub fn make_app(registry: Arc<Registry>, health: HealthTable) -> axum::Router {
    make_app_with_config(registry, health, test_config(5))
}

pub fn make_app_with_config(
    registry: Arc<Registry>,
    health: HealthTable,
    config: OrchestratorConfig,
) -> axum::Router {
    let state = Arc::new(AppState::new(registry, health, transport(), Arc::new(config)));
    create_router(state)
}

// =============================================================================
// Multipart requests
// =============================================================================

/// One part of a hand-built multipart form.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST an image upload for `backend`.
pub fn image_request(backend: &str) -> Request<Body> {
    ocr_request(
        "/ocr/image",
        &[
            FormPart::File {
                name: "image",
                file_name: "receipt.png",
                content_type: "image/png",
                data: PNG_BYTES,
            },
            FormPart::Text("backend", backend),
        ],
    )
}

pub fn ocr_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
