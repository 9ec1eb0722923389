//! Application state and HTTP router construction.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router, middleware};
use chrono::Utc;
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub started_at: Instant,
}

#[derive(Debug, Serialize)]
struct NotFoundBody {
    success: bool,
    error: &'static str,
    path: String,
    method: String,
    timestamp: String,
}

/// JSON 404 for anything neither the API nor the public directory serves
async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            error: "Route not found",
            path: uri.path().to_string(),
            method: method.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// Build the full Axum router: /api, health endpoints, layers, and the
/// static-site fallback. Returns Router<()> (state fully applied) for use
/// with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    use axum::handler::HandlerWithoutStateExt;

    let api = api::router().layer(middleware::from_fn_with_state(
        state.clone(),
        api::require_store,
    ));

    let public = ServeDir::new(&state.config.public_dir)
        .not_found_service(not_found.into_service());

    Router::new()
        .nest("/api", api)
        .merge(api::health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
        .fallback_service(public)
}
