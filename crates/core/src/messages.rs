//! User-facing message catalogue.
//!
//! Every string the bot posts to Slack is produced here so the wording stays
//! in one place. Timestamps are rendered with Slack `<!date^…>` tokens, which
//! display in each viewer's own timezone with a UTC fallback for surfaces
//! that do not expand tokens.

use crate::lock::{ExpirySource, UnlockTrigger};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Fixed notices
// ---------------------------------------------------------------------------

/// Shortcut invoked on a message that is not part of a thread.
pub const NOT_A_THREAD: &str = "❌ This is not a thread";

/// Shortcut invoked by a non-admin in production.
pub const ADMINS_ONLY: &str = "❌ Only admins can run this command.";

/// Shortcut unlock found the lock already released by another trigger.
pub const ALREADY_UNLOCKED: &str = "🔓 This thread is no longer locked.";

/// Modal submission whose metadata no longer parses. The usual cause is a
/// second deployment writing a different metadata shape.
pub const STALE_MODAL: &str = "Something bad happened. Likely more than one instance is running.";

/// In-modal validation message for a missing reason.
pub const ERR_REASON_REQUIRED: &str = "Please provide a reason.";

/// In-modal validation message for a missing or past expiry.
pub const ERR_TIME_IN_PAST: &str = "Time cannot be in the past.";

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Deep link to a thread's root message in the workspace archives.
pub fn permalink(workspace_url: &str, channel_id: &str, thread_ts: &str) -> String {
    format!(
        "{}/archives/{}/p{}",
        workspace_url.trim_end_matches('/'),
        channel_id,
        thread_ts.replace('.', "")
    )
}

/// Render an instant as a Slack date token.
pub fn slack_date(at: Timestamp) -> String {
    format!(
        "<!date^{}^{{date_short_pretty}} at {{time}}|{}>",
        at.timestamp(),
        at.format("%Y-%m-%d %H:%M UTC")
    )
}

// ---------------------------------------------------------------------------
// Thread notices
// ---------------------------------------------------------------------------

/// Posted into the thread when a lock is applied.
pub fn thread_locked_notice(admin_id: &str, reason: &str, expires_at: Timestamp) -> String {
    format!(
        "🔒 Thread locked by <@{admin_id}>. Reason: {reason} (until: {})",
        slack_date(expires_at)
    )
}

/// Posted into the thread when a lock is released.
pub fn thread_unlocked_notice(trigger: &UnlockTrigger) -> String {
    match trigger {
        UnlockTrigger::Admin { user_id } => format!("🔓 Thread unlocked by <@{user_id}>"),
        UnlockTrigger::AutoExpiry { .. } => {
            "🔓 Thread unlocked as enough time has passed.".to_string()
        }
    }
}

/// Ephemeral notice shown to an author whose reply was removed.
pub fn locked_ephemeral(expires_at: Timestamp) -> String {
    format!(
        "Sorry, the thread is currently locked until {}",
        slack_date(expires_at)
    )
}

// ---------------------------------------------------------------------------
// Audit channel lines
// ---------------------------------------------------------------------------

/// Audit line for a lock transition.
pub fn audit_locked(
    channel_id: &str,
    reason: &str,
    admin_id: &str,
    expires_at: Timestamp,
    link: &str,
) -> String {
    format!(
        "🔒 Thread locked in <#{channel_id}>\nReason: {reason}\nAdmin: <@{admin_id}>\nExpires: {}\nLink: {link}",
        slack_date(expires_at)
    )
}

/// Audit line for an unlock transition. The reason and actor lines identify
/// which of the three triggers fired.
pub fn audit_unlocked(channel_id: &str, trigger: &UnlockTrigger, link: &str) -> String {
    format!(
        "🔓 Thread unlocked in <#{channel_id}>\nReason: {}\nAdmin: {}\nLink: {link}",
        unlock_reason(trigger),
        unlock_actor(trigger)
    )
}

fn unlock_reason(trigger: &UnlockTrigger) -> &'static str {
    match trigger {
        UnlockTrigger::Admin { .. } => "Admin clicked unlock.",
        UnlockTrigger::AutoExpiry { source: ExpirySource::Sweep } => {
            "Autounlock (triggered by cron job)"
        }
        UnlockTrigger::AutoExpiry { source: ExpirySource::Message } => {
            "Autounlock (triggered by message)"
        }
    }
}

fn unlock_actor(trigger: &UnlockTrigger) -> String {
    match trigger {
        UnlockTrigger::Admin { user_id } => format!("<@{user_id}>"),
        UnlockTrigger::AutoExpiry { .. } => "System".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
