//! StreamHub Backend - Rust-powered content catalog service
//!
//! Serves the catalog API under /api and the static site shell from the
//! configured public directory.

mod api;
mod app;
mod config;
mod db;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;
use crate::config::Config;
use crate::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamhub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting StreamHub Backend"
    );

    // The server only starts accepting requests once the store is reachable.
    let db = Database::connect_with_retry(&config.database_url, Duration::from_secs(5)).await;
    tracing::info!("Database connected");

    db::schema::ensure_schema(db.pool()).await?;
    tracing::info!("Schema ready");

    let _monitor = db.spawn_monitor(Duration::from_secs(config.db_ping_interval_secs));

    let state = AppState {
        config: config.clone(),
        db: db.clone(),
        started_at: Instant::now(),
    };
    let app = app::build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("Main API: http://localhost:{}/api/contents", config.port);
    tracing::info!("Health: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Database connection closed");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}
