//! Effectful lock transitions.
//!
//! [`LockService`] owns the two state transitions. Both follow the same
//! contract: commit the store change first, then run the user-visible side
//! effects in order of consequence (thread notice, audit line, reaction),
//! each best-effort. Unlock is idempotent: the conditional flip in
//! [`ThreadLockRepo::deactivate`] picks a single winner among concurrent
//! triggers, and only the winner notifies.

use std::sync::Arc;

use chrono::Utc;
use threadlock_core::error::CoreError;
use threadlock_core::lock::{self, UnlockTrigger, LOCK_REACTION};
use threadlock_core::types::Timestamp;
use threadlock_db::models::thread_lock::{ThreadLock, UpsertThreadLock};
use threadlock_db::repositories::ThreadLockRepo;
use threadlock_db::DbPool;
use threadlock_slack::SlackClient;

use crate::error::AppResult;
use crate::locks::notifier::Notifier;

/// Input for arming a lock, as gathered from the modal submission.
#[derive(Debug, Clone)]
pub struct LockRequest {
    pub thread_ts: String,
    pub channel_id: String,
    pub admin_id: String,
    pub reason: String,
    pub expires_at: Timestamp,
}

/// Result of an unlock attempt.
#[derive(Debug)]
pub enum UnlockOutcome {
    /// This caller won the flip; the notifications were sent.
    Unlocked(ThreadLock),
    /// The thread had no active lock, or another trigger got there first.
    NotLocked,
}

impl UnlockOutcome {
    /// The released record, or [`CoreError::NotLocked`] for callers that
    /// need unlock-or-fail semantics.
    pub fn released(self, thread_ts: &str) -> Result<ThreadLock, CoreError> {
        match self {
            UnlockOutcome::Unlocked(record) => Ok(record),
            UnlockOutcome::NotLocked => Err(CoreError::NotLocked(thread_ts.to_string())),
        }
    }
}

pub struct LockService {
    pool: DbPool,
    slack: Arc<SlackClient>,
    notifier: Notifier,
}

impl LockService {
    pub fn new(pool: DbPool, slack: Arc<SlackClient>, notifier: Notifier) -> Self {
        Self {
            pool,
            slack,
            notifier,
        }
    }

    /// Arm (or re-arm) a lock, then notify.
    pub async fn lock(&self, request: LockRequest) -> AppResult<ThreadLock> {
        lock::validate_reason(&request.reason)?;
        lock::validate_expiry(request.expires_at, Utc::now())?;

        let record = ThreadLockRepo::upsert(
            &self.pool,
            &UpsertThreadLock {
                thread_ts: request.thread_ts,
                channel_id: request.channel_id,
                admin_id: request.admin_id,
                reason: request.reason,
                expires_at: request.expires_at,
            },
        )
        .await?;

        tracing::info!(
            thread_ts = %record.thread_ts,
            channel = %record.channel_id,
            admin = %record.admin_id,
            expires_at = %record.expires_at,
            "Thread locked"
        );

        self.notifier.thread_locked(&record).await;
        self.notifier.audit_locked(&record).await;
        if let Err(err) = self
            .slack
            .add_reaction(&record.channel_id, LOCK_REACTION, &record.thread_ts)
            .await
        {
            tracing::warn!(error = %err, thread_ts = %record.thread_ts, "Failed to add lock reaction");
        }

        Ok(record)
    }

    /// Release a lock if it is still active, then notify on the winning path.
    pub async fn unlock(&self, thread_ts: &str, trigger: UnlockTrigger) -> AppResult<UnlockOutcome> {
        let Some(record) = ThreadLockRepo::deactivate(&self.pool, thread_ts).await? else {
            tracing::debug!(thread_ts = %thread_ts, "Unlock requested but no active lock");
            return Ok(UnlockOutcome::NotLocked);
        };

        tracing::info!(thread_ts = %thread_ts, trigger = ?trigger, "Thread unlocked");

        self.notifier.thread_unlocked(&record, &trigger).await;
        self.notifier.audit_unlocked(&record, &trigger).await;
        if let Err(err) = self
            .slack
            .remove_reaction(&record.channel_id, LOCK_REACTION, thread_ts)
            .await
        {
            tracing::warn!(error = %err, thread_ts = %thread_ts, "Failed to remove lock reaction");
        }

        Ok(UnlockOutcome::Unlocked(record))
    }
}
