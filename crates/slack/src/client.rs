//! Slack Web API client.
//!
//! Wraps the handful of Web API methods the bot needs using [`reqwest`].
//! Slack answers every call with HTTP 200 and an `{"ok": bool, "error": …}`
//! envelope, so errors are surfaced from the body rather than the status
//! line. Two tokens are carried: the bot token for ordinary calls, and a
//! user token for `chat.delete`, which must remove other people's messages.

use std::time::Duration;

use serde_json::json;

/// Production Web API endpoint. Tests point the client at a local server.
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Per-request timeout. Slack expects handlers to finish fast; a hung call
/// must never stall the gate or the sweeper for longer than this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the Slack Web API layer.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Slack answered `ok: false`.
    #[error("Slack API error from {method}: {code}")]
    Api { method: &'static str, code: String },
}

/// HTTP client for the Slack Web API.
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
    user_token: String,
}

impl SlackClient {
    /// Create a client against the production Slack endpoint.
    pub fn new(bot_token: String, user_token: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), bot_token, user_token)
    }

    /// Create a client against an arbitrary base URL (used by tests to
    /// record calls against a local server).
    pub fn with_base_url(base_url: String, bot_token: String, user_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token,
            user_token,
        }
    }

    /// Post a message to a channel, optionally inside a thread.
    pub async fn post_message(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        text: &str,
    ) -> Result<(), SlackError> {
        let mut body = json!({ "channel": channel, "text": text });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = json!(ts);
        }
        self.call("chat.postMessage", &self.bot_token, body).await?;
        Ok(())
    }

    /// Post an ephemeral message visible only to `user`.
    pub async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        thread_ts: Option<&str>,
        text: &str,
    ) -> Result<(), SlackError> {
        let mut body = json!({ "channel": channel, "user": user, "text": text });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = json!(ts);
        }
        self.call("chat.postEphemeral", &self.bot_token, body).await?;
        Ok(())
    }

    /// Delete a message. Uses the user token: the bot token can only delete
    /// the bot's own messages.
    pub async fn delete_message(&self, channel: &str, ts: &str) -> Result<(), SlackError> {
        let body = json!({ "channel": channel, "ts": ts });
        self.call("chat.delete", &self.user_token, body).await?;
        Ok(())
    }

    /// Add an emoji reaction to a message.
    pub async fn add_reaction(
        &self,
        channel: &str,
        name: &str,
        timestamp: &str,
    ) -> Result<(), SlackError> {
        let body = json!({ "channel": channel, "name": name, "timestamp": timestamp });
        self.call("reactions.add", &self.bot_token, body).await?;
        Ok(())
    }

    /// Remove an emoji reaction from a message.
    pub async fn remove_reaction(
        &self,
        channel: &str,
        name: &str,
        timestamp: &str,
    ) -> Result<(), SlackError> {
        let body = json!({ "channel": channel, "name": name, "timestamp": timestamp });
        self.call("reactions.remove", &self.bot_token, body).await?;
        Ok(())
    }

    /// Whether a user is a workspace admin, per `users.info`.
    ///
    /// Accounts without the field (bots, single-channel guests) count as
    /// non-admin.
    pub async fn user_is_admin(&self, user_id: &str) -> Result<bool, SlackError> {
        let method = "users.info";
        tracing::debug!(method, user = user_id, "Calling Slack Web API");
        let response = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.bot_token)
            .query(&[("user", user_id)])
            .send()
            .await?;
        let payload = Self::parse_envelope(method, response).await?;
        Ok(payload
            .get("user")
            .and_then(|user| user.get("is_admin"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false))
    }

    /// Open a modal in response to a shortcut's `trigger_id`.
    pub async fn open_view(
        &self,
        trigger_id: &str,
        view: serde_json::Value,
    ) -> Result<(), SlackError> {
        let body = json!({ "trigger_id": trigger_id, "view": view });
        self.call("views.open", &self.bot_token, body).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// POST a Web API method and return the decoded envelope payload.
    async fn call(
        &self,
        method: &'static str,
        token: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, SlackError> {
        tracing::debug!(method, "Calling Slack Web API");
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::parse_envelope(method, response).await
    }

    /// Decode the `{"ok": …}` envelope, mapping `ok: false` to
    /// [`SlackError::Api`] with the error code Slack reported.
    async fn parse_envelope(
        method: &'static str,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, SlackError> {
        let payload: serde_json::Value = response.json().await?;
        match payload.get("ok").and_then(serde_json::Value::as_bool) {
            Some(true) => Ok(payload),
            _ => Err(SlackError::Api {
                method,
                code: payload
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown_error")
                    .to_string(),
            }),
        }
    }
}
