//! HTTP API.
//!
//! Multipart OCR endpoints plus health, backend listing and metrics. Handlers
//! share one [`AppState`]; none of them ever probe a backend directly.

mod backends;
mod health;
mod ocr;
pub mod types;

pub use backends::{BackendEndpoints, BackendView, BackendsResponse};
pub use health::{BackendHealthView, HealthResponse, OrchestratorInfo};
pub use types::*;

use crate::config::OrchestratorConfig;
use crate::health::HealthTable;
use crate::metrics::MetricsCollector;
use crate::registry::Registry;
use crate::routing;
use crate::transport::OcrTransport;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared application state for all handlers.
pub struct AppState {
    pub registry: Arc<Registry>,
    pub health: HealthTable,
    pub router: Arc<routing::Router>,
    pub config: Arc<OrchestratorConfig>,
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    pub fn new(
        registry: Arc<Registry>,
        health: HealthTable,
        transport: Arc<dyn OcrTransport>,
        config: Arc<OrchestratorConfig>,
    ) -> Self {
        let start_time = Instant::now();

        let router = Arc::new(routing::Router::new(
            Arc::clone(&registry),
            health.clone(),
            transport,
            &config.routing,
        ));

        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::detached_handle()
        });

        let metrics_collector = Arc::new(MetricsCollector::new(
            Arc::clone(&registry),
            health.clone(),
            start_time,
            prometheus_handle,
        ));

        Self {
            registry,
            health,
            router,
            config,
            start_time,
            metrics_collector,
        }
    }
}

/// CORS for the configured browser origins. Origins that are not valid
/// header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/ocr/image", post(ocr::handle_image))
        .route("/ocr/pdf", post(ocr::handle_pdf))
        .route("/health", get(health::handle))
        .route("/backends", get(backends::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
