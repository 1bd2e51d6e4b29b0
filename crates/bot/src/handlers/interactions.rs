//! Interactivity endpoint: the lock shortcut and the lock modal.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use threadlock_core::lock::{self, UnlockTrigger};
use threadlock_core::messages;
use threadlock_db::repositories::ThreadLockRepo;
use threadlock_slack::interactions::{
    InteractionPayload, MessageActionPayload, ViewSubmissionPayload,
};
use threadlock_slack::views::{self, ModalMetadata};

use crate::error::{AppError, AppResult};
use crate::locks::service::{LockRequest, UnlockOutcome};
use crate::state::AppState;

/// Form wrapper Slack uses for interactivity callbacks: a single `payload`
/// field holding a JSON document.
#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    payload: String,
}

/// POST /slack/interactions -- interactivity callbacks.
pub async fn receive_interaction(
    State(state): State<AppState>,
    Form(form): Form<InteractionForm>,
) -> AppResult<Response> {
    let payload: InteractionPayload = serde_json::from_str(&form.payload)
        .map_err(|err| AppError::BadRequest(format!("Unparseable interaction payload: {err}")))?;

    match payload {
        InteractionPayload::MessageAction(action)
            if action.callback_id == views::CALLBACK_LOCK_SHORTCUT =>
        {
            // Acknowledge within Slack's three-second window; the flow
            // continues on a detached task.
            tokio::spawn(run_lock_shortcut(state, action));
            Ok(StatusCode::OK.into_response())
        }
        InteractionPayload::ViewSubmission(submission)
            if submission.view.callback_id == views::CALLBACK_LOCK_MODAL =>
        {
            handle_lock_submission(state, submission).await
        }
        _ => Ok(StatusCode::OK.into_response()),
    }
}

/// The lock shortcut flow: privilege check, then either open the lock modal
/// (no active lock) or release the existing lock.
async fn run_lock_shortcut(state: AppState, action: MessageActionPayload) {
    let channel_id = action.channel.id;
    let invoker = action.user.id;

    let Some(thread_ts) = action.message.thread_ts else {
        send_ephemeral(&state, &channel_id, &invoker, None, messages::NOT_A_THREAD).await;
        return;
    };

    if state.config.env.is_production() {
        match state.slack.user_is_admin(&invoker).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user = %invoker, channel = %channel_id, "Lock shortcut denied for non-admin");
                send_ephemeral(
                    &state,
                    &channel_id,
                    &invoker,
                    Some(&thread_ts),
                    messages::ADMINS_ONLY,
                )
                .await;
                return;
            }
            Err(err) => {
                tracing::error!(error = %err, user = %invoker, "Privilege lookup failed, dropping shortcut");
                return;
            }
        }
    }

    let record = match ThreadLockRepo::find(&state.pool, &thread_ts).await {
        Ok(record) => record,
        Err(err) => {
            tracing::error!(error = %err, thread_ts = %thread_ts, "Lock lookup failed");
            return;
        }
    };

    if record.is_some_and(|r| r.active) {
        // The shortcut doubles as the unlock button on an armed thread.
        let trigger = UnlockTrigger::Admin {
            user_id: invoker.clone(),
        };
        match state.locks.unlock(&thread_ts, trigger).await {
            Ok(UnlockOutcome::Unlocked(_)) => {}
            Ok(UnlockOutcome::NotLocked) => {
                // Raced an expiry between the lookup and the flip. The state
                // the invoker wanted already holds; tell them and stop.
                tracing::info!(thread_ts = %thread_ts, "Lock was already released");
                send_ephemeral(
                    &state,
                    &channel_id,
                    &invoker,
                    Some(&thread_ts),
                    messages::ALREADY_UNLOCKED,
                )
                .await;
            }
            Err(err) => {
                tracing::error!(error = %err, thread_ts = %thread_ts, "Admin unlock failed");
            }
        }
    } else {
        let metadata = ModalMetadata {
            thread_ts,
            channel_id,
        };
        if let Err(err) = state
            .slack
            .open_view(&action.trigger_id, views::lock_modal(&metadata))
            .await
        {
            tracing::error!(error = %err, "Failed to open lock modal");
        }
    }
}

/// Validate and acknowledge a lock modal submission.
///
/// Validation failures keep the modal open with the error attached to the
/// offending block. On success the modal closes immediately (empty 200) and
/// the lock transition runs on a detached task, inside the acknowledgment
/// deadline.
async fn handle_lock_submission(
    state: AppState,
    submission: ViewSubmissionPayload,
) -> AppResult<Response> {
    let metadata = match ModalMetadata::decode(&submission.view.private_metadata) {
        Ok(metadata) => metadata,
        Err(err) => {
            // The metadata is the only thing tying this submission to a
            // thread; without it there is nothing to lock.
            tracing::error!(error = %err, "Dropping modal submission with unreadable metadata");
            return Ok(modal_errors(views::REASON_BLOCK_ID, messages::STALE_MODAL));
        }
    };

    let form = views::extract_lock_form(&submission.view.state);
    if lock::validate_reason(&form.reason).is_err() {
        return Ok(modal_errors(
            views::REASON_BLOCK_ID,
            messages::ERR_REASON_REQUIRED,
        ));
    }
    let expires_at = match form.expires_at {
        Some(at) if lock::validate_expiry(at, Utc::now()).is_ok() => at,
        _ => {
            return Ok(modal_errors(
                views::EXPIRY_BLOCK_ID,
                messages::ERR_TIME_IN_PAST,
            ));
        }
    };

    let request = LockRequest {
        thread_ts: metadata.thread_ts,
        channel_id: metadata.channel_id,
        admin_id: submission.user.id,
        reason: form.reason,
        expires_at,
    };
    tokio::spawn(async move {
        if let Err(err) = state.locks.lock(request).await {
            tracing::error!(error = %err, "Lock transition failed after acknowledgment");
        }
    });

    Ok(StatusCode::OK.into_response())
}

/// Build a `response_action: errors` body that keeps the modal open with a
/// message under the given block.
fn modal_errors(block_id: &str, message: &str) -> Response {
    Json(json!({
        "response_action": "errors",
        "errors": { block_id: message },
    }))
    .into_response()
}

async fn send_ephemeral(
    state: &AppState,
    channel: &str,
    user: &str,
    thread_ts: Option<&str>,
    text: &str,
) {
    if let Err(err) = state.slack.post_ephemeral(channel, user, thread_ts, text).await {
        tracing::warn!(error = %err, user, "Failed to post ephemeral notice");
    }
}
