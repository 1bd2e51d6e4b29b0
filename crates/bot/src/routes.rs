//! Router assembly.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;
use crate::middleware::signature::verify_slack_signature;
use crate::state::AppState;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the application router with the full middleware stack.
///
/// Shared by `main` and the integration tests, so both exercise the identical
/// surface.
pub fn app_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    // Signature verification covers the Slack endpoints only; /health stays
    // unsigned for probes.
    let slack_routes = Router::new()
        .route("/slack/events", post(handlers::events::receive_event))
        .route(
            "/slack/interactions",
            post(handlers::interactions::receive_interaction),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            verify_slack_signature,
        ));

    Router::new()
        .merge(handlers::health::router())
        .merge(slack_routes)
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}
