//! Response Normalizer.
//!
//! Maps each backend family's native JSON into a [`UnifiedResult`]. The
//! normalizer is pure: it never performs I/O and never measures time.

mod deepseek;
mod error;
mod mineru;
mod result;


pub use error::NormalizeError;
pub use result::UnifiedResult;

use crate::registry::{BackendFamily, Registry};
use serde_json::Value;
use std::collections::HashMap;

/// Extraction rule for one backend family. Receives the full native body.
pub type NormalizeFn = fn(&Value) -> Result<NormalizedBody, NormalizeError>;

/// Fields extracted from a native body, before the router adds timing and
/// file metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBody {
    pub raw_result: Value,
    pub markdown: String,
    pub source_markdown: String,
    pub boxes_image: Option<String>,
    pub page_count: Option<u32>,
    pub processed_pages: Vec<u32>,
}

impl NormalizedBody {
    pub fn new(raw_result: Value, markdown: String) -> Self {
        Self {
            raw_result,
            source_markdown: markdown.clone(),
            markdown,
            boxes_image: None,
            page_count: None,
            processed_pages: Vec::new(),
        }
    }
}

/// Extraction rule for a backend family.
pub fn strategy_for(family: BackendFamily) -> NormalizeFn {
    match family {
        BackendFamily::DeepSeek => deepseek::normalize,
        BackendFamily::Mineru => mineru::normalize,
    }
}

/// Per-backend dispatch table, built once from the registry.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    strategies: HashMap<String, NormalizeFn>,
}

impl Normalizer {
    pub fn from_registry(registry: &Registry) -> Self {
        let strategies = registry
            .list()
            .iter()
            .map(|b| (b.id.clone(), strategy_for(b.family)))
            .collect();
        Self { strategies }
    }

    /// Normalize a 2xx body from `backend_id`.
    ///
    /// # Errors
    ///
    /// `Malformed` for non-JSON or wrongly shaped bodies, `BackendFailure` when
    /// the backend reports `success: false`, `NoStrategy` for unregistered ids.
    pub fn normalize(&self, backend_id: &str, body: &str) -> Result<NormalizedBody, NormalizeError> {
        let strategy = self
            .strategies
            .get(backend_id)
            .ok_or_else(|| NormalizeError::NoStrategy(backend_id.to_string()))?;

        let native: Value = serde_json::from_str(body)
            .map_err(|e| NormalizeError::malformed(format!("invalid JSON: {e}")))?;
        if !native.is_object() {
            return Err(NormalizeError::malformed("expected a JSON object"));
        }

        if native.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(NormalizeError::BackendFailure(failure_message(&native)));
        }

        let mut normalized = strategy(&native)?;
        apply_common_fields(&native, &mut normalized)?;
        Ok(normalized)
    }
}

/// Native `markdown`, if present. Errors when present but not a string.
pub(crate) fn native_markdown(native: &Value) -> Result<Option<&str>, NormalizeError> {
    string_field(native, "markdown")
}

fn string_field<'a>(native: &'a Value, field: &str) -> Result<Option<&'a str>, NormalizeError> {
    match native.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(NormalizeError::malformed(format!("'{field}' must be a string"))),
    }
}

/// `source_markdown` and `boxes_image` mean the same thing for every family.
fn apply_common_fields(native: &Value, body: &mut NormalizedBody) -> Result<(), NormalizeError> {
    if let Some(source) = string_field(native, "source_markdown")? {
        if !source.trim().is_empty() {
            body.source_markdown = source.to_string();
        }
    }
    if body.source_markdown.is_empty() {
        body.source_markdown = body.markdown.clone();
    }

    body.boxes_image = string_field(native, "boxes_image")?
        .filter(|b| !b.is_empty())
        .map(str::to_string);
    Ok(())
}

fn failure_message(native: &Value) -> String {
    ["error", "markdown"]
        .iter()
        .filter_map(|f| native.get(*f).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .unwrap_or("backend reported failure")
        .to_string()
}
