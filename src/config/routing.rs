//! Routing configuration

use serde::{Deserialize, Serialize};

/// Timeouts applied to OCR forwarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Upper bound on one backend OCR call, including the upload
    pub ocr_timeout_seconds: u64,
    /// TCP connect timeout for the shared HTTP client
    pub connect_timeout_seconds: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            ocr_timeout_seconds: 120,
            connect_timeout_seconds: 5,
        }
    }
}
