//! Webhook endpoint handler.
//!
//! Reads the raw delivery, authenticates it, and runs the ingest pipeline
//! synchronously before answering. Once a delivery is authenticated the
//! response is always 200: per-issue labeling failures are logged, not
//! reported to the sender, which would only retry the whole delivery.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::tracker::Labeler;
use crate::webhooks::{ingest_event, verify_signature};

/// Header name for the event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for the HMAC-SHA256 signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Reasons a delivery is refused.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The body could not be read, or exceeded the size limit.
    #[error("failed to read body: {0}")]
    Body(#[from] BytesRejection),

    /// Signature header missing, malformed, or not matching the body.
    #[error("invalid signature")]
    InvalidSignature,

    /// No secret is configured, so nothing can be authenticated.
    #[error("webhook secret not configured")]
    NotConfigured,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::Body(rejection) => rejection.status(),
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookError::NotConfigured => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-Hub-Signature-256`: `sha256=<hex>` HMAC of the body (required)
///   - `X-GitHub-Event`: event type; missing means "unknown event"
/// - Body: JSON payload, at most 1 MiB
///
/// # Response
///
/// - 200 OK: authenticated and processed
/// - 403 Forbidden: bad or missing signature
/// - 413 Payload Too Large: body over the limit
/// - 400 Bad Request: body could not be read
pub async fn webhook_handler<L, F>(
    State(app_state): State<AppState<L, F>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, WebhookError>
where
    L: Labeler + Send + Sync + 'static,
    F: Send + Sync + 'static,
{
    let body = body.inspect_err(|e| warn!(error = %e, "Failed to read webhook body"))?;

    let secret = app_state
        .webhook_secret()
        .ok_or(WebhookError::NotConfigured)?;

    let signature = header_str(&headers, HEADER_SIGNATURE).unwrap_or_default();
    if !verify_signature(&body, signature, secret) {
        warn!(bytes = body.len(), "Invalid webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = header_str(&headers, HEADER_EVENT).unwrap_or_default();
    debug!(event_type, bytes = body.len(), "Received webhook");

    let report = ingest_event(
        app_state.labeler(),
        app_state.team_key(),
        event_type,
        &body,
    )
    .await;

    if !report.identifiers.is_empty() {
        info!(
            event_type,
            identifiers = ?report.identifiers,
            failed = report.failed,
            "Processed webhook"
        );
    }

    Ok(StatusCode::OK)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
