//! The lock modal: builder, submitted-form extraction, and the metadata
//! that ties a submission back to the thread it was opened for.
//!
//! Block and action ids are fixed constants shared by the builder and the
//! extraction path, so validation errors can be attached to the right block
//! and a submitted form can be read without scanning for element kinds.

use serde::{Deserialize, Serialize};
use serde_json::json;
use threadlock_core::error::CoreError;
use threadlock_core::types::Timestamp;

use crate::interactions::ViewState;

/// `callback_id` of the message action that opens the modal.
pub const CALLBACK_LOCK_SHORTCUT: &str = "lock_thread";

/// `callback_id` of the modal itself.
pub const CALLBACK_LOCK_MODAL: &str = "lock_modal";

/// Block id of the reason input.
pub const REASON_BLOCK_ID: &str = "reason_block";

/// Action id of the reason input element.
pub const REASON_ACTION_ID: &str = "reason_input";

/// Block id of the expiry picker.
pub const EXPIRY_BLOCK_ID: &str = "expiry_block";

/// Action id of the expiry picker element.
pub const EXPIRY_ACTION_ID: &str = "expiry_picker";

// ---------------------------------------------------------------------------
// Modal metadata
// ---------------------------------------------------------------------------

/// Round-trips through the modal's `private_metadata` so the submission
/// handler knows which thread the form was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalMetadata {
    pub thread_ts: String,
    pub channel_id: String,
}

impl ModalMetadata {
    /// Serialize for embedding in the view.
    pub fn encode(&self) -> String {
        json!({ "thread_ts": self.thread_ts, "channel_id": self.channel_id }).to_string()
    }

    /// Parse metadata out of a submitted view.
    ///
    /// Failure means the view was opened by an incompatible instance of the
    /// bot (typically two deployments racing); the submission cannot be
    /// attributed to a thread and must be abandoned.
    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|err| CoreError::MalformedState(format!("modal metadata: {err}")))
    }
}

// ---------------------------------------------------------------------------
// Modal construction
// ---------------------------------------------------------------------------

/// Build the lock modal view for `views.open`.
pub fn lock_modal(metadata: &ModalMetadata) -> serde_json::Value {
    json!({
        "type": "modal",
        "callback_id": CALLBACK_LOCK_MODAL,
        "private_metadata": metadata.encode(),
        "title": { "type": "plain_text", "text": "Lock Thread" },
        "submit": { "type": "plain_text", "text": "Lock" },
        "close": { "type": "plain_text", "text": "Cancel" },
        "blocks": [
            {
                "type": "input",
                "block_id": REASON_BLOCK_ID,
                "label": { "type": "plain_text", "text": "Reason" },
                "element": {
                    "type": "plain_text_input",
                    "action_id": REASON_ACTION_ID,
                    "multiline": true,
                    "placeholder": {
                        "type": "plain_text",
                        "text": "Why is this thread being locked?"
                    }
                }
            },
            {
                "type": "input",
                "block_id": EXPIRY_BLOCK_ID,
                "label": { "type": "plain_text", "text": "Locked until" },
                "element": {
                    "type": "datetimepicker",
                    "action_id": EXPIRY_ACTION_ID
                }
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// Submitted form
// ---------------------------------------------------------------------------

/// The two fields of the lock form, as submitted.
///
/// `expires_at` is `None` when the picker value is missing or out of the
/// representable range; validation decides what to tell the submitter.
#[derive(Debug, Clone)]
pub struct LockForm {
    pub reason: String,
    pub expires_at: Option<Timestamp>,
}

/// Read the lock form out of submitted view state by its fixed ids.
pub fn extract_lock_form(state: &ViewState) -> LockForm {
    let reason = state
        .element(REASON_BLOCK_ID, REASON_ACTION_ID)
        .and_then(|element| element.value.clone())
        .unwrap_or_default();
    let expires_at = state
        .element(EXPIRY_BLOCK_ID, EXPIRY_ACTION_ID)
        .and_then(|element| element.selected_date_time)
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
    LockForm { reason, expires_at }
}
