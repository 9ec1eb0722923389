//! Discovery endpoints for the site frontend
//!
//! Featured and trending both return the six most-viewed records (featured
//! additionally requires the flag); search is a broader matcher ordered by
//! popularity instead of recency.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult, params};
use crate::app::AppState;
use crate::db::ContentRecord;

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub success: bool,
    pub count: usize,
    pub contents: Vec<ContentRecord>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub query: String,
    pub contents: Vec<ContentRecord>,
}

/// Featured picks, optionally narrowed to one type
async fn featured(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<DiscoverResponse>> {
    let content_type = params::parse_content_type(query.content_type.as_deref())?;
    let contents = state.db.contents().featured(content_type).await?;

    Ok(Json(DiscoverResponse {
        success: true,
        count: contents.len(),
        contents,
    }))
}

/// Trending picks: same shape as featured, without the featured requirement
async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<DiscoverResponse>> {
    let content_type = params::parse_content_type(query.content_type.as_deref())?;
    let contents = state.db.contents().trending(content_type).await?;

    Ok(Json(DiscoverResponse {
        success: true,
        count: contents.len(),
        contents,
    }))
}

/// Search across title, category, description and languages
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::InvalidParameter("Search query required".to_string()))?;

    let contents = state.db.contents().search(q).await?;
    tracing::debug!(query = q, count = contents.len(), "search executed");

    Ok(Json(SearchResponse {
        success: true,
        count: contents.len(),
        query: q.to_string(),
        contents,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/featured", get(featured))
        .route("/trending", get(trending))
        .route("/search", get(search))
}
