//! Shared test support: a recording stand-in for the Slack Web API, state
//! and router builders wired against it, and signed-request helpers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, Response};
use axum::{Json, Router};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use threadlock_bot::config::{AppConfig, RuntimeEnv};
use threadlock_bot::locks::{LockService, Notifier};
use threadlock_bot::routes;
use threadlock_bot::state::AppState;
use threadlock_core::signing;
use threadlock_slack::SlackClient;

/// Signing secret shared by the test config and the signed-request helpers.
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

// ---------------------------------------------------------------------------
// Mock Slack Web API
// ---------------------------------------------------------------------------

/// One recorded Slack Web API call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// API method, e.g. `chat.postMessage`.
    pub method: String,
    /// JSON request body (empty object for GET methods).
    pub body: serde_json::Value,
}

pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

#[derive(Clone)]
struct MockSlack {
    calls: CallLog,
    admins: Arc<HashSet<String>>,
}

/// Catch-all handler: record the call, then answer `{"ok": true}`. The
/// `users.info` method additionally returns a user object whose `is_admin`
/// flag depends on the configured admin set.
async fn record_call(
    State(mock): State<MockSlack>,
    request: Request<Body>,
) -> Json<serde_json::Value> {
    let method = request.uri().path().trim_start_matches('/').to_string();
    let query = request.uri().query().map(str::to_string);
    let bytes = axum::body::to_bytes(request.into_body(), 1024 * 1024)
        .await
        .unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}));

    mock.calls
        .lock()
        .expect("call log poisoned")
        .push(RecordedCall {
            method: method.clone(),
            body,
        });

    if method == "users.info" {
        let user_id = query
            .as_deref()
            .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("user=")))
            .unwrap_or("")
            .to_string();
        let is_admin = mock.admins.contains(&user_id);
        return Json(json!({ "ok": true, "user": { "id": user_id, "is_admin": is_admin } }));
    }

    Json(json!({ "ok": true }))
}

/// Spawn a local stand-in for the Slack Web API. Every user is a non-admin.
///
/// Returns the base URL to point [`SlackClient`] at, plus the call log.
pub async fn spawn_mock_slack() -> (String, CallLog) {
    spawn_mock_slack_with_admins(&[]).await
}

/// Same, with the given user ids reported as workspace admins.
pub async fn spawn_mock_slack_with_admins(admins: &[&str]) -> (String, CallLog) {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mock = MockSlack {
        calls: Arc::clone(&calls),
        admins: Arc::new(admins.iter().map(|a| a.to_string()).collect()),
    };
    let app = Router::new().fallback(record_call).with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock Slack listener");
    let addr = listener.local_addr().expect("Mock Slack local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock Slack server");
    });

    (format!("http://{addr}"), calls)
}

/// Calls recorded for a given API method, in arrival order.
pub fn calls_to(log: &CallLog, method: &str) -> Vec<RecordedCall> {
    log.lock()
        .expect("call log poisoned")
        .iter()
        .filter(|call| call.method == method)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// State and router builders
// ---------------------------------------------------------------------------

/// Build a test `AppConfig` with safe defaults. The database URL is unused;
/// pools come from `#[sqlx::test]`.
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        bot_token: "xoxb-test".to_string(),
        user_token: "xoxp-test".to_string(),
        signing_secret: TEST_SIGNING_SECRET.to_string(),
        log_channel: "C0LOGCHAN".to_string(),
        workspace_url: "https://example.slack.com".to_string(),
        env: RuntimeEnv::Development,
    }
}

/// Build the full application state against a mock Slack endpoint.
pub fn build_test_state(pool: PgPool, slack_base_url: &str) -> AppState {
    build_test_state_in_env(pool, slack_base_url, RuntimeEnv::Development)
}

/// Same, with the runtime environment pinned. Production mode turns on the
/// admin gate for the lock shortcut.
pub fn build_test_state_in_env(pool: PgPool, slack_base_url: &str, env: RuntimeEnv) -> AppState {
    let mut config = test_config();
    config.env = env;
    let slack = Arc::new(SlackClient::with_base_url(
        slack_base_url.to_string(),
        config.bot_token.clone(),
        config.user_token.clone(),
    ));
    let notifier = Notifier::new(
        Arc::clone(&slack),
        config.log_channel.clone(),
        config.workspace_url.clone(),
    );
    let locks = Arc::new(LockService::new(pool.clone(), Arc::clone(&slack), notifier));

    AppState {
        pool,
        config: Arc::new(config),
        slack,
        locks,
    }
}

/// Build the full application router, identical to production, against a
/// fresh mock Slack endpoint.
pub async fn build_test_app(pool: PgPool) -> Router {
    let (slack_base_url, _calls) = spawn_mock_slack().await;
    routes::app_router(build_test_state(pool, &slack_base_url))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a Slack delivery carrying a valid `v0` signature for the current
/// time.
pub async fn post_signed(app: Router, uri: &str, content_type: &str, body: &str) -> Response<Body> {
    let timestamp = Utc::now().timestamp();
    post_signed_at(app, uri, content_type, body, timestamp).await
}

/// POST a Slack delivery signed for an arbitrary timestamp. Useful for
/// exercising the staleness window.
pub async fn post_signed_at(
    app: Router,
    uri: &str,
    content_type: &str,
    body: &str,
    timestamp: i64,
) -> Response<Body> {
    let signature = signing::sign(TEST_SIGNING_SECRET, timestamp, body.as_bytes());
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", content_type)
            .header("x-slack-request-timestamp", timestamp.to_string())
            .header("x-slack-signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encode a string for use in an `application/x-www-form-urlencoded`
/// body.
pub fn form_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    encoded
}
