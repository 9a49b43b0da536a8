//! Login Recorder - Binary Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use login_recorder::api::{create_router, AppState};
use login_recorder::config::Config;
use login_recorder::event_store::{AppendQueue, EventStore};
use login_recorder::telemetry::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_logging(config.is_development())?;

    tracing::info!(
        version = login_recorder::VERSION,
        environment = %config.environment,
        "Starting login recorder"
    );

    let store = Arc::new(EventStore::open(config.store_config()).await?);
    let queue = AppendQueue::spawn(Arc::clone(&store));

    let addr = format!("{}:{}", config.host, config.port);
    let port = config.port;
    let admin_key = config.admin_key.clone();

    let state = Arc::new(AppState::new(store, queue.handle(), config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Listening");
    tracing::info!("Local:  http://localhost:{}", port);
    tracing::info!("Logs:   http://localhost:{}/admin/logs?key={}", port, admin_key);
    tracing::info!("Health: http://localhost:{}/health", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and its append handles) is gone; flush what is queued
    let flushed = queue.shutdown().await;
    tracing::info!(flushed, "Server shutdown complete");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping gracefully");
}
