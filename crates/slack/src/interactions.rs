//! Interactivity payload types.
//!
//! Slack posts interactivity callbacks as `application/x-www-form-urlencoded`
//! bodies with a single `payload` field containing JSON. These types cover
//! the two shapes the bot subscribes to: the message action (shortcut) and
//! the modal submission.

use std::collections::HashMap;

use serde::Deserialize;

/// A parsed interactivity `payload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    MessageAction(MessageActionPayload),
    ViewSubmission(ViewSubmissionPayload),

    #[serde(other)]
    Other,
}

/// A message action (message-level shortcut) invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageActionPayload {
    pub callback_id: String,
    pub trigger_id: String,
    pub user: UserRef,
    pub channel: ChannelRef,
    pub message: MessageRef,
}

/// A modal submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewSubmissionPayload {
    pub user: UserRef,
    pub view: SubmittedView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

/// The message a shortcut was invoked on.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub ts: String,
    /// Present only when the message belongs to a thread. For both roots and
    /// replies it names the root message.
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// The submitted view, including the metadata planted when it was opened.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedView {
    pub callback_id: String,
    #[serde(default)]
    pub private_metadata: String,
    pub state: ViewState,
}

/// Submitted input state: `values[block_id][action_id]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewState {
    pub values: HashMap<String, HashMap<String, ElementValue>>,
}

/// A single submitted element. Only the fields for the element kinds in the
/// lock modal are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementValue {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_date_time: Option<i64>,
}

impl ViewState {
    /// Look up a submitted element by its fixed block and action ids.
    pub fn element(&self, block_id: &str, action_id: &str) -> Option<&ElementValue> {
        self.values.get(block_id)?.get(action_id)
    }
}
