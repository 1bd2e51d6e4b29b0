//! Pure lock-state decisions.
//!
//! [`evaluate`] is the single authority on what a stored lock row means for a
//! reply observed at a given instant. Both enforcement surfaces (the
//! per-message gate and the periodic expiry sweep) funnel through the same
//! rules so their views of "locked" cannot drift apart.

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Emoji reaction marking the root message of a locked thread.
pub const LOCK_REACTION: &str = "lock";

// ---------------------------------------------------------------------------
// Decision function
// ---------------------------------------------------------------------------

/// What the message gate should do with a reply posted into a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDecision {
    /// No enforcement: no active lock, or the author may bypass it.
    Allow,
    /// The lock holds. Remove the reply and tell the author until when.
    Suppress { expires_at: Timestamp },
    /// The deadline has passed. Release the lock instead of enforcing it.
    Expired,
}

/// Decide how a lock row applies to a reply observed at `now`.
///
/// `active` and `expires_at` come from the stored row. Expiry is checked
/// before privilege, so an admin replying after the deadline still releases
/// the lock rather than silently bypassing it.
pub fn evaluate(
    active: bool,
    expires_at: Timestamp,
    now: Timestamp,
    author_is_admin: bool,
) -> LockDecision {
    if !active {
        return LockDecision::Allow;
    }
    if expires_at <= now {
        return LockDecision::Expired;
    }
    if author_is_admin {
        return LockDecision::Allow;
    }
    LockDecision::Suppress { expires_at }
}

// ---------------------------------------------------------------------------
// Unlock triggers
// ---------------------------------------------------------------------------

/// Which automatic path discovered an expired lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirySource {
    /// The periodic background scan.
    Sweep,
    /// A reply arriving in the locked thread.
    Message,
}

/// What caused an unlock transition. Carried through to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockTrigger {
    /// A workspace admin used the shortcut on an already-locked thread.
    Admin { user_id: String },
    /// The lock expired and one of the automatic paths noticed.
    AutoExpiry { source: ExpirySource },
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject an empty or whitespace-only lock reason.
pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation("Lock reason must not be empty".into()));
    }
    Ok(())
}

/// Reject an expiry that is not strictly in the future.
///
/// The boundary matches [`evaluate`]: an expiry equal to `now` would be
/// treated as already expired, so it is not accepted either.
pub fn validate_expiry(expires_at: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if expires_at <= now {
        return Err(CoreError::Validation("Lock expiry must be in the future".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn at(minutes: i64) -> Timestamp {
        Utc::now() + Duration::minutes(minutes)
    }

    // -- Decision matrix ---------------------------------------------------

    #[test]
    fn inactive_lock_allows_everyone() {
        let now = Utc::now();
        assert_eq!(evaluate(false, at(10), now, false), LockDecision::Allow);
        assert_eq!(evaluate(false, at(-10), now, true), LockDecision::Allow);
    }

    #[test]
    fn active_future_lock_suppresses_non_admin() {
        let expires = at(10);
        assert_eq!(
            evaluate(true, expires, Utc::now(), false),
            LockDecision::Suppress { expires_at: expires }
        );
    }

    #[test]
    fn active_future_lock_allows_admin() {
        assert_eq!(evaluate(true, at(10), Utc::now(), true), LockDecision::Allow);
    }

    #[test]
    fn active_past_lock_expires_for_anyone() {
        let now = Utc::now();
        assert_eq!(evaluate(true, at(-1), now, false), LockDecision::Expired);
        assert_eq!(evaluate(true, at(-1), now, true), LockDecision::Expired);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        assert_eq!(evaluate(true, now, now, false), LockDecision::Expired);
    }

    #[test]
    fn lock_lifecycle_over_five_minutes() {
        // Locked at T for five minutes: a non-admin reply one minute in is
        // suppressed, an admin reply two minutes in passes, and the first
        // reply after the deadline releases the lock.
        let t0 = Utc::now();
        let expires = t0 + Duration::minutes(5);

        assert_eq!(
            evaluate(true, expires, t0 + Duration::minutes(1), false),
            LockDecision::Suppress { expires_at: expires }
        );
        assert_eq!(
            evaluate(true, expires, t0 + Duration::minutes(2), true),
            LockDecision::Allow
        );
        assert_eq!(
            evaluate(true, expires, t0 + Duration::minutes(5), false),
            LockDecision::Expired
        );
    }

    // -- Validation --------------------------------------------------------

    #[test]
    fn reason_must_not_be_empty() {
        assert!(validate_reason("spam cleanup").is_ok());
        assert!(validate_reason("").is_err());
        assert!(validate_reason("   ").is_err());
    }

    #[test]
    fn expiry_must_be_in_the_future() {
        let now = Utc::now();
        assert!(validate_expiry(now + Duration::minutes(1), now).is_ok());
        assert!(validate_expiry(now, now).is_err());
        assert!(validate_expiry(now - Duration::minutes(1), now).is_err());
    }

    #[test]
    fn validation_errors_carry_the_validation_variant() {
        let err = validate_reason("").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("reason"));
    }
}
