//! Database connection and operations

pub mod content;
pub mod schema;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use content::{
    CommandError, ContentFilter, ContentPage, ContentPayload, ContentRecord, ContentRepository,
    ContentType, CreateContent, PageRequest, UpdateContent,
};

/// Observable store connectivity state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connected,
            2 => ConnectionState::Disconnected,
            _ => ConnectionState::Connecting,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Connected => 1,
            ConnectionState::Disconnected => 2,
        }
    }
}

/// Database wrapper providing connection pool access and an observable
/// connection state
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    state: Arc<AtomicU8>,
}

impl Database {
    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            state: Arc::new(AtomicU8::new(ConnectionState::Connecting.as_u8())),
        }
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect(url)
            .await?;

        let db = Self::from_pool(pool);
        db.set_state(ConnectionState::Connected);
        Ok(db)
    }

    /// Create a new database connection pool with retry logic.
    /// Retries every `retry_interval` until successful.
    pub async fn connect_with_retry(url: &str, retry_interval: Duration) -> Self {
        let max_connections = Self::get_max_connections();
        loop {
            match PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(url)
                .await
            {
                Ok(pool) => {
                    let db = Self::from_pool(pool);
                    db.set_state(ConnectionState::Connected);
                    return db;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Database connection failed. Retrying in {} seconds...",
                        retry_interval.as_secs()
                    );
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Current connection state, as last observed by the monitor
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Relaxed))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Relaxed);
    }

    /// Probe store connectivity with a trivial query
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Spawn the connectivity monitor: ping the store on a fixed interval
    /// outside the request path, updating the observable state and logging
    /// transitions. The pool re-dials lazily, so the ping doubles as the
    /// reconnection attempt.
    pub fn spawn_monitor(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let db = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let next = if db.ping().await {
                    ConnectionState::Connected
                } else {
                    ConnectionState::Disconnected
                };
                let previous = db.state();
                if previous != next {
                    match next {
                        ConnectionState::Connected if previous == ConnectionState::Disconnected => {
                            tracing::info!("Database reconnected")
                        }
                        ConnectionState::Connected => tracing::info!("Database connected"),
                        ConnectionState::Disconnected => {
                            tracing::warn!("Database disconnected, attempting to reconnect...")
                        }
                        ConnectionState::Connecting => {}
                    }
                    db.set_state(next);
                }
            }
        })
    }

    /// Get a content repository
    pub fn contents(&self) -> ContentRepository {
        ContentRepository::new(self.pool.clone())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
