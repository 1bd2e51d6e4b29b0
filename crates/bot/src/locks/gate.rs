//! Per-message enforcement.
//!
//! Runs once for every message event the Events API delivers. The cheap path
//! (not a thread reply, no lock row, lock inactive) touches nothing beyond a
//! primary-key lookup. The privilege lookup against `users.info` only happens
//! when an active, unexpired lock would actually suppress the reply.

use chrono::Utc;
use threadlock_core::lock::{self, ExpirySource, LockDecision, UnlockTrigger};
use threadlock_core::messages;
use threadlock_core::types::Timestamp;
use threadlock_db::repositories::ThreadLockRepo;
use threadlock_slack::events::MessageEvent;

use crate::state::AppState;

/// Apply lock enforcement to one message event.
pub async fn handle_message(state: AppState, message: MessageEvent) {
    if !message.is_user_post() {
        return;
    }
    let Some(thread_ts) = message.thread_ts.as_deref() else {
        return;
    };
    let Some(author) = message.user.as_deref() else {
        return;
    };

    let record = match ThreadLockRepo::find(&state.pool, thread_ts).await {
        Ok(Some(record)) => record,
        Ok(None) => return,
        Err(err) => {
            tracing::error!(error = %err, thread_ts, "Lock lookup failed");
            return;
        }
    };

    // First pass assumes a non-privileged author so the common Allow and
    // Expired paths skip the users.info call entirely. Both passes share one
    // clock reading.
    let now = Utc::now();
    match lock::evaluate(record.active, record.expires_at, now, false) {
        LockDecision::Allow => {}
        LockDecision::Expired => {
            let trigger = UnlockTrigger::AutoExpiry {
                source: ExpirySource::Message,
            };
            if let Err(err) = state.locks.unlock(thread_ts, trigger).await {
                tracing::error!(error = %err, thread_ts, "Failed to release expired lock");
            }
        }
        LockDecision::Suppress { .. } => {
            let author_is_admin = match state.slack.user_is_admin(author).await {
                Ok(is_admin) => is_admin,
                Err(err) => {
                    // Unknown privilege: leave the reply alone. The next
                    // reply re-checks.
                    tracing::error!(error = %err, user = author, "Privilege lookup failed");
                    return;
                }
            };
            if let LockDecision::Suppress { expires_at } =
                lock::evaluate(record.active, record.expires_at, now, author_is_admin)
            {
                suppress_reply(&state, &message, thread_ts, author, expires_at).await;
            }
        }
    }
}

/// Ephemeral notice first, then delete: if the elevated delete fails, the
/// author has at least been told the thread is locked.
async fn suppress_reply(
    state: &AppState,
    message: &MessageEvent,
    thread_ts: &str,
    author: &str,
    expires_at: Timestamp,
) {
    let notice = messages::locked_ephemeral(expires_at);
    if let Err(err) = state
        .slack
        .post_ephemeral(&message.channel, author, Some(thread_ts), &notice)
        .await
    {
        tracing::warn!(error = %err, user = author, "Failed to post locked-thread notice");
    }

    if let Err(err) = state.slack.delete_message(&message.channel, &message.ts).await {
        tracing::error!(error = %err, ts = %message.ts, "Failed to delete reply in locked thread");
        return;
    }

    tracing::info!(thread_ts, user = author, ts = %message.ts, "Suppressed reply in locked thread");
}
