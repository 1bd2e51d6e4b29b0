//! Shared application state.

use std::sync::Arc;

use threadlock_db::DbPool;
use threadlock_slack::SlackClient;

use crate::config::AppConfig;
use crate::locks::LockService;

/// Shared application state, available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is internally reference counted and the rest
/// sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Slack Web API client.
    pub slack: Arc<SlackClient>,
    /// Lock transitions, shared by every trigger surface.
    pub locks: Arc<LockService>,
}
