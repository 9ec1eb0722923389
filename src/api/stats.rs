//! Admin dashboard endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::api::ApiResult;
use crate::app::AppState;
use crate::db::{ContentRecord, ContentType};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub movies: i64,
    pub anime: i64,
    pub webseries: i64,
    pub total_content: i64,
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub success: bool,
    pub server: DebugServer,
    pub database: DebugDatabase,
    pub counts: DebugCounts,
    pub sample_data: Vec<ContentRecord>,
}

#[derive(Debug, Serialize)]
pub struct DebugServer {
    pub uptime: u64,
    pub version: &'static str,
    pub environment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugDatabase {
    pub connection_state: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugCounts {
    pub movies: i64,
    pub anime: i64,
    pub webseries: i64,
}

/// Per-type and total record counts for the admin dashboard
async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let repo = state.db.contents();
    let (movies, anime, webseries, total_content) = tokio::try_join!(
        repo.count_by_type(ContentType::Movie),
        repo.count_by_type(ContentType::Anime),
        repo.count_by_type(ContentType::Webseries),
        repo.count_all(),
    )?;

    Ok(Json(StatsResponse {
        success: true,
        movies,
        anime,
        webseries,
        total_content,
        database: "PostgreSQL",
    }))
}

/// Server and store introspection, with a small data sample
async fn debug(State(state): State<AppState>) -> ApiResult<Json<DebugResponse>> {
    let repo = state.db.contents();
    let (movies, anime, webseries, sample_data) = tokio::try_join!(
        repo.count_by_type(ContentType::Movie),
        repo.count_by_type(ContentType::Anime),
        repo.count_by_type(ContentType::Webseries),
        repo.sample(5),
    )?;

    Ok(Json(DebugResponse {
        success: true,
        server: DebugServer {
            uptime: state.started_at.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.clone(),
        },
        database: DebugDatabase {
            connection_state: state.db.state().as_str(),
            kind: "PostgreSQL",
        },
        counts: DebugCounts {
            movies,
            anime,
            webseries,
        },
        sample_data,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/debug", get(debug))
}
