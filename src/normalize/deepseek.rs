//! DeepSeek OCR responses.
//!
//! Images come back as one grounding string with `<|ref|>` and `<|det|>`
//! markers. PDFs come back as an object with one `raw_output` string per
//! processed page. Grounding markers are never parsed; the backend's own
//! `markdown` is preferred and the raw string is only a fallback.

use super::{native_markdown, NormalizeError, NormalizedBody};
use serde_json::Value;

const END_OF_TEXT: &str = "<|endoftext|>";

pub(super) fn normalize(native: &Value) -> Result<NormalizedBody, NormalizeError> {
    let raw = native
        .get("raw_result")
        .and_then(|r| r.get("deepseek"))
        .ok_or_else(|| NormalizeError::malformed("missing raw_result.deepseek"))?;

    match raw {
        Value::String(text) => {
            let markdown = native_markdown(native)?
                .map(clean)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| clean(text));
            Ok(NormalizedBody::new(raw.clone(), markdown))
        }
        Value::Object(doc) => {
            let pages = doc
                .get("pages")
                .and_then(Value::as_array)
                .ok_or_else(|| NormalizeError::malformed("raw_result.deepseek has no pages array"))?;

            let mut page_texts = Vec::with_capacity(pages.len());
            for (i, page) in pages.iter().enumerate() {
                let text = page
                    .get("raw_output")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        NormalizeError::malformed(format!("page entry {i} has no raw_output"))
                    })?;
                let number = page.get("page").and_then(Value::as_u64).unwrap_or(i as u64 + 1);
                page_texts.push((number, clean(text)));
            }

            let processed_pages = match doc.get("processed_pages") {
                Some(v) => page_numbers(v)?,
                None => page_texts.iter().map(|(n, _)| *n as u32).collect(),
            };
            let page_count = doc
                .get("total_pages")
                .and_then(Value::as_u64)
                .map(|n| n as u32)
                .or(Some(pages.len() as u32));

            let markdown = native_markdown(native)?
                .map(clean)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| join_pages(&page_texts));

            let mut body = NormalizedBody::new(raw.clone(), markdown);
            body.page_count = page_count;
            body.processed_pages = processed_pages;
            Ok(body)
        }
        _ => Err(NormalizeError::malformed(
            "raw_result.deepseek must be a string or an object",
        )),
    }
}

/// Strip end-of-text tokens and surrounding whitespace.
pub(super) fn clean(text: &str) -> String {
    text.replace(END_OF_TEXT, "").trim().to_string()
}

fn join_pages(pages: &[(u64, String)]) -> String {
    pages
        .iter()
        .map(|(n, text)| format!("{text}\n<--- Page {n} --->"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn page_numbers(value: &Value) -> Result<Vec<u32>, NormalizeError> {
    let items = value
        .as_array()
        .ok_or_else(|| NormalizeError::malformed("processed_pages must be an array"))?;
    items
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|n| n as u32)
                .ok_or_else(|| NormalizeError::malformed("processed_pages must hold integers"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_strips_end_of_text() {
        assert_eq!(clean("  # Title<|endoftext|>\n"), "# Title");
    }

    #[test]
    fn test_image_without_markdown_falls_back_to_cleaned_raw() {
        let raw = "<|ref|>Hello<|/ref|><|det|>[[1,2,3,4]]<|/det|><|endoftext|>";
        let native = json!({
            "success": true,
            "raw_result": {"deepseek": raw, "mineru": {}},
            "markdown": ""
        });
        let body = normalize(&native).unwrap();
        assert_eq!(body.markdown, "<|ref|>Hello<|/ref|><|det|>[[1,2,3,4]]<|/det|>");
        assert_eq!(body.raw_result, json!(raw));
    }

    #[test]
    fn test_image_uses_native_markdown() {
        let native = json!({
            "success": true,
            "raw_result": {"deepseek": "<|ref|>Hi<|/ref|><|det|>[[0,0,1,1]]<|/det|>", "mineru": {}},
            "markdown": "Hi<|endoftext|>"
        });
        let body = normalize(&native).unwrap();
        assert_eq!(body.markdown, "Hi");
        assert_eq!(body.raw_result, json!("<|ref|>Hi<|/ref|><|det|>[[0,0,1,1]]<|/det|>"));
        assert!(body.page_count.is_none());
    }

    #[test]
    fn test_pdf_falls_back_to_page_text() {
        let native = json!({
            "success": true,
            "raw_result": {"deepseek": {
                "pages": [
                    {"page": 2, "raw_output": "second"},
                    {"page": 4, "raw_output": "fourth<|endoftext|>"}
                ],
                "total_pages": 2,
                "processed_pages": [2, 4]
            }},
            "markdown": ""
        });
        let body = normalize(&native).unwrap();
        assert_eq!(body.markdown, "second\n<--- Page 2 --->\n\nfourth\n<--- Page 4 --->");
        assert_eq!(body.page_count, Some(2));
        assert_eq!(body.processed_pages, vec![2, 4]);
    }

    #[test]
    fn test_rejects_page_without_raw_output() {
        let native = json!({"raw_result": {"deepseek": {"pages": [{"page": 1}]}}});
        assert!(matches!(normalize(&native), Err(NormalizeError::Malformed(_))));
    }

    #[test]
    fn test_rejects_numeric_raw() {
        let native = json!({"raw_result": {"deepseek": 42}});
        assert!(matches!(normalize(&native), Err(NormalizeError::Malformed(_))));
    }
}
