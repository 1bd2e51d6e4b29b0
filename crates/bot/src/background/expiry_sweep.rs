//! Periodic expiry sweep.
//!
//! [`ExpirySweeper`] runs as a background task, scanning once a minute (and
//! once at startup, since `tokio::time::interval` ticks immediately) for
//! active locks whose deadline has passed. Each expired lock is released
//! through [`LockService::unlock`]; the conditional flip there means a sweep
//! racing the message gate can never double-notify.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use threadlock_core::lock::{ExpirySource, UnlockTrigger};
use threadlock_db::repositories::ThreadLockRepo;
use threadlock_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::locks::service::{LockService, UnlockOutcome};

/// How often the sweeper scans for expired locks.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Background service that releases expired locks.
pub struct ExpirySweeper {
    pool: DbPool,
    locks: Arc<LockService>,
}

impl ExpirySweeper {
    pub fn new(pool: DbPool, locks: Arc<LockService>) -> Self {
        Self { pool, locks }
    }

    /// Run the sweep loop until cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Expiry sweeper cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        tracing::error!(error = %err, "Expiry sweep failed");
                    }
                }
            }
        }
    }

    /// One sweep pass: scan for expired locks and release them all.
    ///
    /// Releases run concurrently and fail independently; one thread that
    /// cannot be released never stops the rest of the batch.
    pub async fn sweep_once(&self) -> Result<(), sqlx::Error> {
        let expired = ThreadLockRepo::find_expired(&self.pool, Utc::now()).await?;
        if expired.is_empty() {
            return Ok(());
        }

        let releases = expired.into_iter().map(|record| {
            let locks = Arc::clone(&self.locks);
            async move {
                let trigger = UnlockTrigger::AutoExpiry {
                    source: ExpirySource::Sweep,
                };
                match locks.unlock(&record.thread_ts, trigger).await {
                    Ok(UnlockOutcome::Unlocked(_)) => {
                        tracing::info!(thread_ts = %record.thread_ts, "Expired lock released");
                    }
                    Ok(UnlockOutcome::NotLocked) => {
                        // Raced another trigger; the winner already notified.
                        tracing::debug!(thread_ts = %record.thread_ts, "Expired lock already released");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, thread_ts = %record.thread_ts, "Failed to release expired lock");
                    }
                }
            }
        });
        let count = join_all(releases).await.len();

        tracing::info!(count, "Expiry sweep completed");
        Ok(())
    }
}
