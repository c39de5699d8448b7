//! The unified per-backend response returned to clients.

use super::NormalizedBody;
use crate::routing::{ErrorKind, PayloadKind, RoutingError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Backend-independent OCR result.
///
/// Built once per backend call, either from a normalized body or from a
/// routing failure, and serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedResult {
    pub success: bool,
    #[serde(rename = "backend")]
    pub backend_id: String,
    /// Backend-native payload, untouched. `null` on failure.
    pub raw_result: Value,
    pub markdown: String,
    pub source_markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxes_image: Option<String>,
    /// Seconds, measured by the orchestrator around the backend call.
    pub processing_time: f64,
    pub file_name: String,
    pub file_type: PayloadKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processed_pages: Vec<u32>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl UnifiedResult {
    /// Successful result from a normalized backend body.
    pub fn from_normalized(
        backend_id: impl Into<String>,
        body: NormalizedBody,
        file_name: impl Into<String>,
        kind: PayloadKind,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            backend_id: backend_id.into(),
            raw_result: body.raw_result,
            markdown: body.markdown,
            source_markdown: body.source_markdown,
            boxes_image: body.boxes_image,
            processing_time: elapsed.as_secs_f64(),
            file_name: file_name.into(),
            file_type: kind,
            page_count: body.page_count,
            processed_pages: body.processed_pages,
            error_message: None,
            error_kind: None,
        }
    }

    /// Failed result carrying the routing error's message and kind.
    pub fn failure(
        backend_id: impl Into<String>,
        error: &RoutingError,
        file_name: impl Into<String>,
        kind: PayloadKind,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            backend_id: backend_id.into(),
            raw_result: Value::Null,
            markdown: String::new(),
            source_markdown: String::new(),
            boxes_image: None,
            processing_time: elapsed.as_secs_f64(),
            file_name: file_name.into(),
            file_type: kind,
            page_count: None,
            processed_pages: Vec::new(),
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }
}
