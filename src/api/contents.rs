//! Generic content endpoints
//!
//! `/api/contents` lists across all families with optional type, category
//! and search filters; `/api/content/:id` fetches one record and counts
//! the view.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult, Pagination, params};
use crate::app::AppState;
use crate::db::{ContentFilter, ContentRecord, PageRequest};

const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
    #[serde(rename = "type")]
    content_type: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentsResponse {
    pub success: bool,
    pub contents: Vec<ContentRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub success: bool,
    pub content: ContentRecord,
}

/// List contents with pagination and optional filters
async fn list_contents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ContentsResponse>> {
    let page = params::parse_page(query.page.as_deref())?;
    let limit = params::parse_limit(query.limit.as_deref(), DEFAULT_LIMIT)?;
    let filter = ContentFilter {
        content_type: params::parse_content_type(query.content_type.as_deref())?,
        category: params::non_empty(query.category),
        search: params::non_empty(query.search),
    };

    let result = state
        .db
        .contents()
        .list(&filter, &PageRequest { page, limit })
        .await?;
    let pagination = Pagination::from(&result);
    tracing::debug!(
        count = result.items.len(),
        page,
        total_pages = pagination.total_pages,
        "contents listed"
    );

    Ok(Json(ContentsResponse {
        success: true,
        contents: result.items,
        pagination,
    }))
}

/// Get a single content record by id, counting the view
async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContentResponse>> {
    let id = params::parse_id(&id, "Content")?;
    let content = state
        .db
        .contents()
        .record_view(id)
        .await?
        .ok_or(ApiError::NotFound("Content"))?;

    tracing::debug!(title = %content.title, views = content.views, "content viewed");

    Ok(Json(ContentResponse {
        success: true,
        content,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contents", get(list_contents))
        .route("/content/{id}", get(get_content))
}
