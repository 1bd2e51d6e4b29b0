//! Bot configuration, loaded from environment variables.

/// Runtime environment, selected by `APP_ENV`.
///
/// The admin requirement on the lock shortcut only binds in production;
/// development workspaces rarely mirror the real admin roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Bot token (`xoxb-`), used for posting, reactions and user lookups.
    pub bot_token: String,
    /// User token (`xoxp-`) with `chat:write` scope, used to delete other
    /// members' messages.
    pub user_token: String,
    /// Signing secret for verifying inbound Slack requests.
    pub signing_secret: String,
    /// Channel id that receives the audit log.
    pub log_channel: String,
    /// Workspace base URL, used to build message permalinks.
    pub workspace_url: String,
    /// Runtime environment.
    pub env: RuntimeEnv,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Required | Default                      |
    /// |------------------------|----------|------------------------------|
    /// | `DATABASE_URL`         | yes      |                              |
    /// | `SLACK_BOT_TOKEN`      | yes      |                              |
    /// | `SLACK_USER_TOKEN`     | yes      |                              |
    /// | `SLACK_SIGNING_SECRET` | yes      |                              |
    /// | `SLACK_LOG_CHANNEL`    | yes      |                              |
    /// | `SLACK_WORKSPACE_URL`  | no       | `https://hackclub.slack.com` |
    /// | `APP_ENV`              | no       | `development`                |
    /// | `HOST`                 | no       | `0.0.0.0`                    |
    /// | `PORT`                 | no       | `3000`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                message: format!("'{raw}' is not a valid port number"),
            })?,
            Err(_) => 3000,
        };
        let env = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => RuntimeEnv::Production,
            _ => RuntimeEnv::Development,
        };
        let workspace_url = std::env::var("SLACK_WORKSPACE_URL")
            .unwrap_or_else(|_| "https://hackclub.slack.com".to_string());

        Ok(Self {
            host,
            port,
            database_url: required("DATABASE_URL")?,
            bot_token: required("SLACK_BOT_TOKEN")?,
            user_token: required("SLACK_USER_TOKEN")?,
            signing_secret: required("SLACK_SIGNING_SECRET")?,
            log_channel: required("SLACK_LOG_CHANNEL")?,
            workspace_url,
            env,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
