//! Type-partitioned endpoint families
//!
//! `/api/movies`, `/api/anime` and `/api/webseries` expose the same
//! list/get/create/update/delete surface with the type fixed at the route
//! level. Each family answers under its own key (`movies`, `anime`,
//! `webseries`), so the shared cores build the body with `json!`.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{ApiError, ApiResult, Pagination, params};
use crate::app::AppState;
use crate::db::{ContentFilter, ContentPayload, ContentType, CreateContent, PageRequest, UpdateContent};

const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// List one family's records with pagination
async fn list_family(
    state: AppState,
    family: ContentType,
    query: PageQuery,
) -> ApiResult<Json<Value>> {
    let page = params::parse_page(query.page.as_deref())?;
    let limit = params::parse_limit(query.limit.as_deref(), DEFAULT_LIMIT)?;

    let result = state
        .db
        .contents()
        .list(&ContentFilter::for_type(family), &PageRequest { page, limit })
        .await?;
    let pagination = Pagination::from(&result);
    tracing::debug!(
        family = family.as_str(),
        count = result.items.len(),
        page,
        total_pages = pagination.total_pages,
        "family listed"
    );

    Ok(Json(json!({
        "success": true,
        "count": result.items.len(),
        family.plural(): result.items,
        "pagination": pagination,
    })))
}

/// Get a single record of the family's type, counting the view.
/// A record of another type is not found here.
async fn get_family(state: AppState, family: ContentType, raw_id: String) -> ApiResult<Json<Value>> {
    let id = params::parse_id(&raw_id, family.noun())?;
    let record = state
        .db
        .contents()
        .record_view_for_type(id, family)
        .await?
        .ok_or(ApiError::NotFound(family.noun()))?;

    Ok(Json(json!({
        "success": true,
        family.as_str(): record,
    })))
}

/// Create a record with the family's type pinned
async fn create_family(
    state: AppState,
    family: ContentType,
    payload: ContentPayload,
) -> ApiResult<Json<Value>> {
    let command = CreateContent::from_payload(payload, family)?;
    tracing::info!(title = %command.title, family = family.as_str(), "adding content");

    let record = state.db.contents().create(command).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} added successfully", family.noun()),
        family.as_str(): record,
    })))
}

/// Update a record, re-pinning its type to the family
async fn update_family(
    state: AppState,
    family: ContentType,
    raw_id: String,
    payload: ContentPayload,
) -> ApiResult<Json<Value>> {
    let id = params::parse_id(&raw_id, family.noun())?;
    let command = UpdateContent::from_payload(payload, family)?;

    let record = state
        .db
        .contents()
        .update(id, command)
        .await?
        .ok_or(ApiError::NotFound(family.noun()))?;
    tracing::info!(title = %record.title, family = family.as_str(), "content updated");

    Ok(Json(json!({
        "success": true,
        "message": format!("{} updated successfully", family.noun()),
        family.as_str(): record,
    })))
}

/// Delete a record by id
async fn delete_family(
    state: AppState,
    family: ContentType,
    raw_id: String,
) -> ApiResult<Json<Value>> {
    let id = params::parse_id(&raw_id, family.noun())?;

    if !state.db.contents().delete(id).await? {
        return Err(ApiError::NotFound(family.noun()));
    }
    tracing::info!(id = %id, family = family.as_str(), "content deleted");

    Ok(Json(json!({
        "success": true,
        "message": format!("{} deleted successfully", family.noun()),
    })))
}

async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    list_family(state, ContentType::Movie, query).await
}

async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    get_family(state, ContentType::Movie, id).await
}

async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    create_family(state, ContentType::Movie, payload).await
}

async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    update_family(state, ContentType::Movie, id, payload).await
}

async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_family(state, ContentType::Movie, id).await
}

async fn list_anime(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    list_family(state, ContentType::Anime, query).await
}

async fn get_anime(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    get_family(state, ContentType::Anime, id).await
}

async fn create_anime(
    State(state): State<AppState>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    create_family(state, ContentType::Anime, payload).await
}

async fn update_anime(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    update_family(state, ContentType::Anime, id, payload).await
}

async fn delete_anime(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_family(state, ContentType::Anime, id).await
}

async fn list_webseries(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Value>> {
    list_family(state, ContentType::Webseries, query).await
}

async fn get_webseries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    get_family(state, ContentType::Webseries, id).await
}

async fn create_webseries(
    State(state): State<AppState>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    create_family(state, ContentType::Webseries, payload).await
}

async fn update_webseries(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContentPayload>,
) -> ApiResult<Json<Value>> {
    update_family(state, ContentType::Webseries, id, payload).await
}

async fn delete_webseries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    delete_family(state, ContentType::Webseries, id).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route("/anime", get(list_anime).post(create_anime))
        .route(
            "/anime/{id}",
            get(get_anime).put(update_anime).delete(delete_anime),
        )
        .route("/webseries", get(list_webseries).post(create_webseries))
        .route(
            "/webseries/{id}",
            get(get_webseries).put(update_webseries).delete(delete_webseries),
        )
}
