//! Request handlers for the download endpoints.
//!
//! Validation outcomes are part of the wire contract and must keep their
//! exact wording, including the misspelling in the access-error message.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use serde::Serialize;
use tracing::{info, warn};
use urlstash_core::DownloadRequest;
use urlstash_jobs::{ValidationError, check_reachable, check_required, sanitize_url};

use crate::models::{SubmitRequest, TaskResponse};
use crate::state::ApiState;

/// Cookie that identifies the session and doubles as the storage
/// credential.
const SESSION_COOKIE: &str = "osf";
/// Session bucket for requests that carry no session cookie.
const ANONYMOUS_SESSION: &str = "anonymous";

const MSG_MISSING_URL: &str = "Please specify an URL.";
const MSG_MISSING_DESTINATION: &str = "Please specify the destination to save the file(s).";
const MSG_INVALID_RESPONSE: &str = "URL returned an invalid response.";
const MSG_ACCESS_ERROR: &str = "An error ocurred while accessing the URL.";
const MSG_CANCELLED: &str = "Download task has been cancelled.";
const MSG_NO_TASKS: &str = "There are no active download tasks.";

/// Accept a download submission: validate, probe the url, then enqueue a
/// background job. Rejections come back as a 200 with `status: Failed`.
pub(crate) async fn submit(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitRequest>,
) -> Json<TaskResponse> {
    if let Err(error) = check_required(&payload.url, &payload.pid) {
        return Json(TaskResponse::failed(validation_message(&error)));
    }
    let url = sanitize_url(&payload.url);
    if let Err(error) = check_reachable(&state.probe, &url).await {
        warn!(error = %error, "submission rejected by reachability probe");
        return Json(TaskResponse::failed(validation_message(&error)));
    }

    let cookie = session_cookie(&headers);
    let session_id = cookie.as_deref().unwrap_or(ANONYMOUS_SESSION).to_string();
    let request = DownloadRequest {
        url,
        recursive: payload.recursive,
        use_interval: payload.interval,
        interval_seconds: payload.interval_value,
        destination_project_id: payload.pid,
        destination_folder_id: payload.folder_id,
    };
    let job_id = state
        .registry
        .submit(&session_id, cookie.as_deref().unwrap_or_default(), request);
    info!(job_id = %job_id, "download job accepted");
    Json(TaskResponse::ok())
}

/// Cancel every tracked job of the caller's session.
pub(crate) async fn cancel(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Json<TaskResponse> {
    let cookie = session_cookie(&headers);
    let session_id = cookie.as_deref().unwrap_or(ANONYMOUS_SESSION);
    let cancelled = state.registry.cancel_all(session_id);
    if cancelled == 0 {
        return Json(TaskResponse {
            status: "No download tasks",
            message: Some(MSG_NO_TASKS),
        });
    }
    Json(TaskResponse::ok_with(MSG_CANCELLED))
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Liveness probe.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Map a validation failure onto its user-facing message.
const fn validation_message(error: &ValidationError) -> &'static str {
    match error {
        ValidationError::MissingUrl => MSG_MISSING_URL,
        ValidationError::MissingDestination => MSG_MISSING_DESTINATION,
        ValidationError::InvalidResponse { .. } => MSG_INVALID_RESPONSE,
        ValidationError::UnreachableHost { .. } => MSG_ACCESS_ERROR,
    }
}

/// Pull the session cookie's value out of the request headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers.get_all(COOKIE).iter().find_map(|value| {
        value.to_str().ok().and_then(|cookies| {
            cookies
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(name, _)| *name == SESSION_COOKIE)
                .map(|(_, value)| value.to_string())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_extracted_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; osf=abc123; lang=en"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_session_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert!(session_cookie(&headers).is_none());
        assert!(session_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn validation_messages_keep_their_exact_wording() {
        assert_eq!(
            validation_message(&ValidationError::MissingUrl),
            "Please specify an URL."
        );
        assert_eq!(
            validation_message(&ValidationError::MissingDestination),
            "Please specify the destination to save the file(s)."
        );
        assert_eq!(
            validation_message(&ValidationError::InvalidResponse { status: 404 }),
            "URL returned an invalid response."
        );
    }
}
