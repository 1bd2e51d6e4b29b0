//! Events API endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use threadlock_slack::events::{EventEnvelope, InboundEvent};

use crate::locks::gate;
use crate::state::AppState;

/// POST /slack/events -- Events API deliveries.
///
/// Slack retries any delivery that is not acknowledged within three seconds,
/// so message events are acknowledged immediately and enforcement runs on a
/// detached task.
pub async fn receive_event(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            tracing::info!("Answering Events API url_verification handshake");
            Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            if let InboundEvent::Message(message) = event {
                tokio::spawn(gate::handle_message(state, message));
            }
            StatusCode::OK.into_response()
        }
        EventEnvelope::Other => StatusCode::OK.into_response(),
    }
}
