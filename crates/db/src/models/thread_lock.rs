//! Thread lock entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use threadlock_core::types::Timestamp;

/// A row from the `thread_locks` table.
///
/// `thread_ts` is the Slack timestamp of the thread's root message and the
/// primary key: a thread has at most one lock record, re-armed in place when
/// the thread is locked again. `active = false` rows are retained as history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ThreadLock {
    pub thread_ts: String,
    pub channel_id: String,
    pub admin_id: String,
    pub reason: String,
    pub expires_at: Timestamp,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for arming (or re-arming) a thread lock.
#[derive(Debug, Clone)]
pub struct UpsertThreadLock {
    pub thread_ts: String,
    pub channel_id: String,
    pub admin_id: String,
    pub reason: String,
    pub expires_at: Timestamp,
}
