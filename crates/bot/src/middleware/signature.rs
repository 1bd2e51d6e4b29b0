//! Slack request signature verification.
//!
//! Applied to every `/slack/*` route. Buffers the raw body (the signature is
//! computed over the exact bytes), verifies the `x-slack-signature` header
//! against the signing secret, and reassembles the request for the inner
//! handler. Deliveries that fail verification are rejected before any payload
//! parsing happens.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use threadlock_core::signing;

use crate::error::AppError;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-slack-signature";
const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Upper bound on buffered request bodies. Events API payloads are a few
/// kilobytes; anything near this size is not Slack.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub async fn verify_slack_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let timestamp: i64 = parts
        .headers
        .get(TIMESTAMP_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing or invalid request timestamp".to_string()))?;

    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Missing request signature".to_string()))?;

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| AppError::BadRequest(format!("Unreadable request body: {err}")))?;

    signing::verify(
        &state.config.signing_secret,
        timestamp,
        &bytes,
        &signature,
        Utc::now().timestamp(),
    )
    .map_err(|err| {
        tracing::warn!(error = ?err, "Rejected Slack delivery");
        AppError::Unauthorized("Invalid request signature".to_string())
    })?;

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
