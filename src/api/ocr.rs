//! OCR upload endpoints.

use crate::api::{ApiError, AppState};
use crate::logging::{generate_request_id, outcome_status, truncate_prompt};
use crate::normalize::UnifiedResult;
use crate::routing::{
    BackendSelector, OcrRequest, PageSelection, PayloadKind, RequestError, RouteOutcome,
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

const PROMPT_LOG_CHARS: usize = 60;

/// POST /ocr/image
pub async fn handle_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    handle_upload(state, PayloadKind::Image, multipart).await
}

/// POST /ocr/pdf
pub async fn handle_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    handle_upload(state, PayloadKind::Pdf, multipart).await
}

async fn handle_upload(
    state: Arc<AppState>,
    kind: PayloadKind,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = generate_request_id();
    let span = tracing::info_span!("ocr_request", request_id = %request_id, kind = %kind);

    let mut response = async move {
        let parsed = match multipart {
            Ok(multipart) => read_upload(kind, multipart).await,
            Err(rejection) => Err(RequestError::Multipart(rejection.body_text()).into()),
        };
        let request = match parsed {
            Ok(request) => request,
            Err(rejection) => {
                tracing::info!(error = %rejection.error.message, "Rejected upload");
                return rejection.into_response();
            }
        };

        tracing::info!(
            backend = %request.selector,
            file_name = %request.file_name,
            bytes = request.payload.len(),
            pages = ?request.pages.as_slice(),
            "OCR request received"
        );
        if let Some(prompt) = &request.prompt {
            tracing::debug!(prompt = %truncate_prompt(prompt, PROMPT_LOG_CHARS), "Custom prompt");
        }

        let start = Instant::now();
        let result = state.router.route(&request).await;
        let elapsed = start.elapsed();

        let (status, error_kind) = outcome_status(&result);
        tracing::info!(
            status,
            error_kind = error_kind.map(|k| k.as_str()).unwrap_or(""),
            elapsed_ms = elapsed.as_millis() as u64,
            "OCR request completed"
        );

        match result {
            Ok(RouteOutcome::Single(unified)) => (StatusCode::OK, Json(unified)).into_response(),
            Ok(RouteOutcome::Compare(results)) => (StatusCode::OK, Json(results)).into_response(),
            Err(error) => {
                let code = StatusCode::from_u16(error.kind().http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let failed = UnifiedResult::failure(
                    error.backend_id(),
                    &error,
                    &request.file_name,
                    request.kind,
                    elapsed,
                );
                (code, Json(failed)).into_response()
            }
        }
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// File, backend selector, prompt and pages collected from the form.
#[derive(Default)]
struct UploadForm {
    file: Option<(Bytes, Option<String>, Option<String>)>,
    backend: Option<String>,
    prompt: Option<String>,
    pages: Option<String>,
}

async fn read_upload(kind: PayloadKind, mut multipart: Multipart) -> Result<OcrRequest, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == kind.as_str() {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            form.file = Some((data, file_name, content_type));
            continue;
        }
        match name.as_str() {
            "backend" => form.backend = Some(field.text().await.map_err(multipart_error)?),
            "prompt" => form.prompt = Some(field.text().await.map_err(multipart_error)?),
            "pages" => form.pages = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let (data, file_name, content_type) = form.file.ok_or(RequestError::MissingFile(kind))?;
    let selector = BackendSelector::parse(form.backend.as_deref().unwrap_or_default())?;

    let mut request = OcrRequest::new(selector, kind, file_name.unwrap_or_default(), data)?;
    if let Some(content_type) = content_type {
        request = request.with_content_type(content_type);
    }
    if let Some(prompt) = form.prompt {
        request = request.with_prompt(prompt);
    }
    if let Some(pages) = form.pages {
        request = request.with_pages(PageSelection::parse_json(&pages)?)?;
    }

    Ok(request)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(&e.body_text())
    } else {
        RequestError::Multipart(e.body_text()).into()
    }
}
