//! Inbound OCR request model.

use crate::registry::Capability;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{is_compare_sentinel, COMPARE_ALL};

/// Kind of uploaded payload. Same vocabulary as backend capabilities.
pub type PayloadKind = Capability;

/// Where a request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelector {
    /// One backend by id
    Single(String),
    /// Every registered backend
    CompareAll,
}

impl BackendSelector {
    /// Parse the `backend` form field.
    ///
    /// `compare-all` and its aliases `compare` / `all` select compare mode.
    /// Anything else is treated as a backend id and resolved later.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(RequestError::MissingBackend);
        }
        if is_compare_sentinel(value) {
            return Ok(BackendSelector::CompareAll);
        }
        Ok(BackendSelector::Single(value.to_string()))
    }

    pub fn is_compare(&self) -> bool {
        matches!(self, BackendSelector::CompareAll)
    }
}

impl std::fmt::Display for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendSelector::Single(id) => f.write_str(id),
            BackendSelector::CompareAll => f.write_str(COMPARE_ALL),
        }
    }
}

/// 1-based page numbers to process from a PDF, deduplicated in first-seen order.
///
/// Empty means every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSelection(Vec<u32>);

impl PageSelection {
    pub fn new(pages: impl IntoIterator<Item = u32>) -> Result<Self, RequestError> {
        let mut seen = Vec::new();
        for page in pages {
            if page == 0 {
                return Err(RequestError::InvalidPages(
                    "page numbers start at 1".to_string(),
                ));
            }
            if !seen.contains(&page) {
                seen.push(page);
            }
        }
        Ok(Self(seen))
    }

    /// Parse the `pages` form field: a JSON array of positive integers.
    /// A blank field selects every page.
    pub fn parse_json(raw: &str) -> Result<Self, RequestError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let values: Vec<i64> = serde_json::from_str(raw)
            .map_err(|_| RequestError::InvalidPages(format!("expected a JSON array of page numbers, got '{raw}'")))?;

        let pages = values
            .into_iter()
            .map(|v| {
                u32::try_from(v)
                    .map_err(|_| RequestError::InvalidPages(format!("invalid page number {v}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pages)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// A validated OCR upload, ready to route.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    pub selector: BackendSelector,
    pub kind: PayloadKind,
    pub file_name: String,
    pub content_type: String,
    pub payload: Bytes,
    pub prompt: Option<String>,
    pub pages: PageSelection,
}

impl OcrRequest {
    /// Build a request. Empty payloads are rejected.
    pub fn new(
        selector: BackendSelector,
        kind: PayloadKind,
        file_name: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Result<Self, RequestError> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(RequestError::EmptyFile);
        }
        let file_name = file_name.into();
        let file_name = if file_name.trim().is_empty() {
            default_file_name(kind).to_string()
        } else {
            file_name
        };

        Ok(Self {
            selector,
            kind,
            file_name,
            content_type: default_content_type(kind).to_string(),
            payload,
            prompt: None,
            pages: PageSelection::default(),
        })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if !content_type.trim().is_empty() {
            self.content_type = content_type;
        }
        self
    }

    /// Blank prompts are dropped so backends use their default.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.prompt = if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        };
        self
    }

    /// Page selection only applies to PDFs.
    pub fn with_pages(mut self, pages: PageSelection) -> Result<Self, RequestError> {
        if !pages.is_empty() && self.kind != PayloadKind::Pdf {
            return Err(RequestError::PagesNotAllowed);
        }
        self.pages = pages;
        Ok(self)
    }
}

fn default_file_name(kind: PayloadKind) -> &'static str {
    match kind {
        PayloadKind::Image => "upload.png",
        PayloadKind::Pdf => "upload.pdf",
    }
}

fn default_content_type(kind: PayloadKind) -> &'static str {
    match kind {
        PayloadKind::Image => "application/octet-stream",
        PayloadKind::Pdf => "application/pdf",
    }
}

/// Client-side request problems, detected before any backend is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing 'backend' field")]
    MissingBackend,

    #[error("missing '{0}' file field")]
    MissingFile(PayloadKind),

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("invalid 'pages' field: {0}")]
    InvalidPages(String),

    #[error("'pages' is only supported for PDF uploads")]
    PagesNotAllowed,

    #[error("invalid multipart body: {0}")]
    Multipart(String),
}
