//! Health check endpoints
//!
//! These live outside /api and keep answering while the store is down,
//! reporting the observed connection state instead of failing.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: ServerHealth,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct ServerHealth {
    pub uptime: u64,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Detailed health check
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        server: ServerHealth {
            uptime: state.started_at.elapsed().as_secs(),
            timestamp: Utc::now().to_rfc3339(),
            environment: state.config.environment.clone(),
        },
        database: DatabaseHealth {
            status: state.db.state().as_str(),
            kind: "PostgreSQL",
        },
    })
}

/// Simple status check for load balancers
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "UP",
        database: if state.db.is_connected() {
            "CONNECTED"
        } else {
            "DISCONNECTED"
        },
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
}
