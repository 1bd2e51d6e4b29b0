//! Application error type and HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use threadlock_core::error::CoreError;

/// Application-level error type.
///
/// Wraps [`CoreError`] for domain failures and adds the storage and HTTP
/// variants the bot produces itself. Implements [`IntoResponse`] so handlers
/// can return it directly and get a consistent JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::NotLocked(thread_ts) => (
                    StatusCode::NOT_FOUND,
                    "NOT_LOCKED",
                    format!("No active lock for thread {thread_ts}"),
                ),
                CoreError::MalformedState(msg) => {
                    tracing::error!(error = %msg, "Malformed lock state");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MALFORMED_STATE",
                        "Lock state could not be interpreted".to_string(),
                    )
                }
            },
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
