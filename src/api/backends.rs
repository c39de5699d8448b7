//! Backend listing endpoint.

use crate::api::AppState;
use crate::health::HealthState;
use crate::registry::{BackendDescriptor, BackendFamily, Capability};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsResponse {
    pub backends: Vec<BackendView>,
}

/// Registry entry joined with its current health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendView {
    pub id: String,
    pub name: String,
    pub family: BackendFamily,
    pub url: String,
    pub capabilities: Vec<Capability>,
    pub endpoints: BackendEndpoints,
    pub metadata: BTreeMap<String, String>,
    pub health: HealthState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendEndpoints {
    pub health: String,
    pub image: String,
    pub pdf: String,
}

impl BackendView {
    pub fn new(backend: &BackendDescriptor, health: HealthState) -> Self {
        Self {
            id: backend.id.clone(),
            name: backend.display_name.clone(),
            family: backend.family,
            url: backend.base_url.clone(),
            capabilities: backend.capabilities.clone(),
            endpoints: BackendEndpoints {
                health: backend.health_url(),
                image: backend.ocr_url(Capability::Image),
                pdf: backend.ocr_url(Capability::Pdf),
            },
            metadata: backend
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            health,
        }
    }
}

/// GET /backends - List registered backends in routing order.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<BackendsResponse> {
    let backends = state
        .registry
        .list()
        .iter()
        .map(|b| BackendView::new(b, state.health.current_status(&b.id).unwrap_or_default()))
        .collect();

    Json(BackendsResponse { backends })
}
