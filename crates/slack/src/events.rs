//! Events API payload types.
//!
//! Slack delivers events as JSON with an outer `type` discriminator
//! (`url_verification` during endpoint setup, `event_callback` afterwards)
//! and an inner `event.type`. Both levels deserialize into internally-tagged
//! enums; unknown types fall into `Other` so new Slack event kinds never
//! break the endpoint.

use serde::Deserialize;

/// Outer Events API delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Endpoint ownership handshake: the challenge must be echoed back.
    UrlVerification { challenge: String },

    /// A subscribed workspace event.
    EventCallback { event: InboundEvent },

    #[serde(other)]
    Other,
}

/// Inner workspace event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(MessageEvent),

    #[serde(other)]
    Other,
}

/// A `message` event.
///
/// Everything beyond `channel` and `ts` is optional: edits and deletions
/// carry a `subtype`, bot posts carry `bot_id` and may lack `user`, and only
/// replies carry `thread_ts`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    pub channel: String,
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageEvent {
    /// Whether this is an ordinary user-authored message.
    ///
    /// Edits, deletions, joins, and bot posts (including this bot's own
    /// notices) are filtered out so the gate never moderates them.
    pub fn is_user_post(&self) -> bool {
        self.subtype.is_none() && self.bot_id.is_none() && self.user.is_some()
    }
}
