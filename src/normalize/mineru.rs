//! Mineru responses: structured JSON with a `middle_json` layout tree.

use super::{native_markdown, NormalizeError, NormalizedBody};
use serde_json::Value;

pub(super) fn normalize(native: &Value) -> Result<NormalizedBody, NormalizeError> {
    let raw = native
        .get("raw_result")
        .and_then(|r| r.get("mineru"))
        .ok_or_else(|| NormalizeError::malformed("missing raw_result.mineru"))?;
    let doc = raw
        .as_object()
        .ok_or_else(|| NormalizeError::malformed("raw_result.mineru must be an object"))?;

    let content = match doc.get("content") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim()),
        Some(_) => return Err(NormalizeError::malformed("raw_result.mineru.content must be a string")),
    };

    let markdown = native_markdown(native)?
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or(content)
        .unwrap_or_default()
        .to_string();

    let page_count = doc
        .get("middle_json")
        .and_then(|m| m.get("pdf_info"))
        .and_then(Value::as_array)
        .map(|pages| pages.len() as u32);

    let mut body = NormalizedBody::new(raw.clone(), markdown);
    body.page_count = page_count;
    Ok(body)
}
