//! Repository for the `thread_locks` table.

use sqlx::PgPool;
use threadlock_core::types::Timestamp;

use crate::models::thread_lock::{ThreadLock, UpsertThreadLock};

/// Column list for `thread_locks` queries.
const COLUMNS: &str =
    "thread_ts, channel_id, admin_id, reason, expires_at, active, created_at, updated_at";

/// Provides the lock store operations.
pub struct ThreadLockRepo;

impl ThreadLockRepo {
    /// Find the lock record for a thread. Returns `None` if the thread has
    /// never been locked.
    pub async fn find(
        pool: &PgPool,
        thread_ts: &str,
    ) -> Result<Option<ThreadLock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM thread_locks WHERE thread_ts = $1");
        sqlx::query_as::<_, ThreadLock>(&query)
            .bind(thread_ts)
            .fetch_optional(pool)
            .await
    }

    /// Arm a lock. Creates the record if absent, otherwise re-arms the
    /// existing one with the new admin, reason, and expiry.
    ///
    /// Uses `ON CONFLICT (thread_ts) DO UPDATE` to guarantee one row per
    /// thread.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertThreadLock,
    ) -> Result<ThreadLock, sqlx::Error> {
        let query = format!(
            "INSERT INTO thread_locks (thread_ts, channel_id, admin_id, reason, expires_at, active) \
             VALUES ($1, $2, $3, $4, $5, TRUE) \
             ON CONFLICT (thread_ts) DO UPDATE \
             SET channel_id = EXCLUDED.channel_id, \
                 admin_id = EXCLUDED.admin_id, \
                 reason = EXCLUDED.reason, \
                 expires_at = EXCLUDED.expires_at, \
                 active = TRUE, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ThreadLock>(&query)
            .bind(&input.thread_ts)
            .bind(&input.channel_id)
            .bind(&input.admin_id)
            .bind(&input.reason)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically flip a lock from active to inactive.
    ///
    /// The `active = TRUE` guard makes this the idempotence point for every
    /// unlock trigger: when several callers race, exactly one gets the row
    /// back and the rest get `None`. Callers must only emit notifications on
    /// the `Some` path.
    pub async fn deactivate(
        pool: &PgPool,
        thread_ts: &str,
    ) -> Result<Option<ThreadLock>, sqlx::Error> {
        let query = format!(
            "UPDATE thread_locks \
             SET active = FALSE, updated_at = NOW() \
             WHERE thread_ts = $1 AND active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ThreadLock>(&query)
            .bind(thread_ts)
            .fetch_optional(pool)
            .await
    }

    /// All active locks whose expiry is at or before `now`, oldest first.
    pub async fn find_expired(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ThreadLock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thread_locks \
             WHERE active = TRUE AND expires_at <= $1 \
             ORDER BY expires_at ASC"
        );
        sqlx::query_as::<_, ThreadLock>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
