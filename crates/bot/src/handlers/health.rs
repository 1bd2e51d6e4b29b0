use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
///
/// Always answers 200; probes read the body. A failing database check
/// reports `degraded` rather than an error status, since the Slack endpoints
/// may still be acknowledging deliveries while the store recovers.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match threadlock_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check cannot reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount the health check route (unsigned; it has to stay reachable for
/// probes without Slack headers).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
