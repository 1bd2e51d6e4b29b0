//! Post-commit notifications for lock transitions.
//!
//! Every notification here is best-effort: the store transition has already
//! committed by the time these run, so a failed Slack call is logged and
//! swallowed rather than allowed to mask the remaining notifications.

use std::sync::Arc;

use threadlock_core::lock::UnlockTrigger;
use threadlock_core::messages;
use threadlock_db::models::thread_lock::ThreadLock;
use threadlock_slack::SlackClient;

/// Sends the user-visible notices and audit lines for lock transitions.
pub struct Notifier {
    slack: Arc<SlackClient>,
    log_channel: String,
    workspace_url: String,
}

impl Notifier {
    pub fn new(slack: Arc<SlackClient>, log_channel: String, workspace_url: String) -> Self {
        Self {
            slack,
            log_channel,
            workspace_url,
        }
    }

    /// Notice into the locked thread.
    pub async fn thread_locked(&self, lock: &ThreadLock) {
        let text = messages::thread_locked_notice(&lock.admin_id, &lock.reason, lock.expires_at);
        if let Err(err) = self
            .slack
            .post_message(&lock.channel_id, Some(&lock.thread_ts), &text)
            .await
        {
            tracing::warn!(error = %err, thread_ts = %lock.thread_ts, "Failed to post lock notice");
        }
    }

    /// Audit line for a lock.
    pub async fn audit_locked(&self, lock: &ThreadLock) {
        let link = messages::permalink(&self.workspace_url, &lock.channel_id, &lock.thread_ts);
        let text = messages::audit_locked(
            &lock.channel_id,
            &lock.reason,
            &lock.admin_id,
            lock.expires_at,
            &link,
        );
        if let Err(err) = self.slack.post_message(&self.log_channel, None, &text).await {
            tracing::warn!(error = %err, thread_ts = %lock.thread_ts, "Failed to post lock audit line");
        }
    }

    /// Notice into the thread that the lock is gone.
    pub async fn thread_unlocked(&self, lock: &ThreadLock, trigger: &UnlockTrigger) {
        let text = messages::thread_unlocked_notice(trigger);
        if let Err(err) = self
            .slack
            .post_message(&lock.channel_id, Some(&lock.thread_ts), &text)
            .await
        {
            tracing::warn!(error = %err, thread_ts = %lock.thread_ts, "Failed to post unlock notice");
        }
    }

    /// Audit line for an unlock.
    pub async fn audit_unlocked(&self, lock: &ThreadLock, trigger: &UnlockTrigger) {
        let link = messages::permalink(&self.workspace_url, &lock.channel_id, &lock.thread_ts);
        let text = messages::audit_unlocked(&lock.channel_id, trigger, &link);
        if let Err(err) = self.slack.post_message(&self.log_channel, None, &text).await {
            tracing::warn!(error = %err, thread_ts = %lock.thread_ts, "Failed to post unlock audit line");
        }
    }
}
