//! Field extraction helpers for structured logging

use crate::routing::{ErrorKind, RouteOutcome, RoutingError};

/// Status label and error kind for a routed request's log line.
///
/// Compare requests are `success` when at least one backend succeeded and
/// `error` otherwise; per-backend failures are logged by the router.
///
/// # Examples
///
/// ```
/// use ocr_router::logging::outcome_status;
/// use ocr_router::routing::{ErrorKind, RouteOutcome, RoutingError};
///
/// let result: Result<RouteOutcome, RoutingError> = Err(RoutingError::UnknownBackend {
///     id: "tesseract".to_string(),
/// });
/// assert_eq!(outcome_status(&result), ("error", Some(ErrorKind::UnknownBackend)));
/// ```
pub fn outcome_status(
    result: &Result<RouteOutcome, RoutingError>,
) -> (&'static str, Option<ErrorKind>) {
    match result {
        Ok(RouteOutcome::Single(_)) => ("success", None),
        Ok(RouteOutcome::Compare(results)) if results.succeeded() > 0 => ("success", None),
        Ok(RouteOutcome::Compare(_)) => ("error", None),
        Err(e) => ("error", Some(e.kind())),
    }
}

/// Truncate a prompt for logging, on a character boundary.
///
/// # Examples
///
/// ```
/// use ocr_router::logging::truncate_prompt;
///
/// assert_eq!(truncate_prompt("Convert to markdown", 7), "Convert...");
/// assert_eq!(truncate_prompt("short", 100), "short");
/// ```
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        prompt.to_string()
    } else {
        let truncated: String = prompt.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
