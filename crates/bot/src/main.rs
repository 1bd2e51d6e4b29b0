use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threadlock_bot::background::ExpirySweeper;
use threadlock_bot::config::AppConfig;
use threadlock_bot::locks::{LockService, Notifier};
use threadlock_bot::{routes, state};
use threadlock_slack::SlackClient;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Configuration error, refusing to start");
            std::process::exit(1);
        }
    };
    tracing::info!(host = %config.host, port = %config.port, env = ?config.env, "Loaded configuration");
    if !config.env.is_production() {
        tracing::info!("Development mode: admin check on the lock shortcut is disabled");
    }

    // --- Database ---
    let pool = threadlock_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    threadlock_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    threadlock_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Slack client and lock service ---
    let slack = Arc::new(SlackClient::new(
        config.bot_token.clone(),
        config.user_token.clone(),
    ));
    let notifier = Notifier::new(
        Arc::clone(&slack),
        config.log_channel.clone(),
        config.workspace_url.clone(),
    );
    let locks = Arc::new(LockService::new(pool.clone(), Arc::clone(&slack), notifier));

    // --- Expiry sweeper ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweeper = ExpirySweeper::new(pool.clone(), Arc::clone(&locks));
    let sweep_cancel_clone = sweep_cancel.clone();
    let sweep_handle = tokio::spawn(async move {
        sweeper.run(sweep_cancel_clone).await;
    });
    tracing::info!("Expiry sweeper started");

    // --- App state and router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        slack,
        locks,
    };
    let app = routes::app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Expiry sweeper stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Initialise the tracing subscriber.
///
/// `LOG_FORMAT=json` switches to the JSON formatter for log aggregation;
/// anything else gets the human-readable default.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "threadlock_bot=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
