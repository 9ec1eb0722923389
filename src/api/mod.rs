//! API route definitions and the response envelope
//!
//! Every endpoint answers `{success: true, ...}` or
//! `{success: false, error}` with a status matching the failure:
//! 400 invalid input, 404 not found, 503 store unreachable, 500 otherwise.

pub mod contents;
pub mod discover;
pub mod families;
pub mod health;
pub mod params;
pub mod stats;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;

use crate::app::AppState;
use crate::db::{CommandError, ConnectionState, ContentPage};

/// Failure conditions an endpoint can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidParameter(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Database temporarily unavailable")]
    StoreUnavailable,
    #[error(transparent)]
    Internal(anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // A store that cannot be reached is reported as unavailable rather
        // than as a generic failure.
        if let Some(db_err) = err.downcast_ref::<sqlx::Error>()
            && is_connection_error(db_err)
        {
            return ApiError::StoreUnavailable;
        }
        ApiError::Internal(err)
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
    )
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = %err, "request failed");
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Pagination metadata returned alongside paginated listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub limit: i64,
}

impl From<&ContentPage> for Pagination {
    fn from(page: &ContentPage) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
            total: page.total,
            limit: page.limit,
        }
    }
}

/// Fail fast with 503 while the store is disconnected, instead of letting
/// requests queue up against a dead pool
pub async fn require_store(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.db.state() == ConnectionState::Disconnected {
        return ApiError::StoreUnavailable.into_response();
    }
    next.run(request).await
}

/// All /api routes
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(contents::router())
        .merge(families::router())
        .merge(discover::router())
        .merge(stats::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::InvalidParameter("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation("title is required".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Movie").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::StoreUnavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_messages_name_the_noun() {
        assert_eq!(ApiError::NotFound("Content").to_string(), "Content not found");
        assert_eq!(ApiError::NotFound("WebSeries").to_string(), "WebSeries not found");
    }

    #[test]
    fn connection_shaped_errors_map_to_store_unavailable() {
        let err = anyhow::Error::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(ApiError::from(err), ApiError::StoreUnavailable));

        let err = anyhow::Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(ApiError::from(err), ApiError::Internal(_)));
    }

    #[test]
    fn pagination_mirrors_the_page() {
        let page = ContentPage::new(Vec::new(), 12, &crate::db::PageRequest { page: 2, limit: 5 });
        let pagination = Pagination::from(&page);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.total, 12);
        assert_eq!(pagination.limit, 5);
    }
}
