//! Content catalog database repository
//!
//! One `contents` table holds every catalog entry (movies, anime, web
//! series). Listing, search, featured/trending and the view counter all
//! run as single store operations here.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;
use uuid::Uuid;

/// Content type enum, fixed per route family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Anime,
    Webseries,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Anime => "anime",
            ContentType::Webseries => "webseries",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentType::Movie),
            "anime" => Some(ContentType::Anime),
            "webseries" => Some(ContentType::Webseries),
            _ => None,
        }
    }

    /// Response key for family list endpoints
    pub fn plural(&self) -> &'static str {
        match self {
            ContentType::Movie => "movies",
            ContentType::Anime => "anime",
            ContentType::Webseries => "webseries",
        }
    }

    /// Display name used in messages ("Movie added successfully")
    pub fn noun(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::Anime => "Anime",
            ContentType::Webseries => "WebSeries",
        }
    }
}

/// Per-quality download links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadLinks {
    #[serde(rename = "480p", default, skip_serializing_if = "Option::is_none")]
    pub p480: Option<String>,
    #[serde(rename = "720p", default, skip_serializing_if = "Option::is_none")]
    pub p720: Option<String>,
    #[serde(rename = "1080p", default, skip_serializing_if = "Option::is_none")]
    pub p1080: Option<String>,
    #[serde(rename = "4k", default, skip_serializing_if = "Option::is_none")]
    pub p4k: Option<String>,
}

/// A zip archive link with its display size
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZipEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Per-quality zip downloads, plus free-form season/series bundles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipDownload {
    #[serde(rename = "480p", default, skip_serializing_if = "Option::is_none")]
    pub p480: Option<ZipEntry>,
    #[serde(rename = "720p", default, skip_serializing_if = "Option::is_none")]
    pub p720: Option<ZipEntry>,
    #[serde(rename = "1080p", default, skip_serializing_if = "Option::is_none")]
    pub p1080: Option<ZipEntry>,
    #[serde(rename = "4k", default, skip_serializing_if = "Option::is_none")]
    pub p4k: Option<ZipEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_wise: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_series: Option<JsonValue>,
}

/// An episode embedded in a series record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_download: Option<ZipDownload>,
}

/// Content record from database
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub language: Vec<String>,
    pub quality: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_download: Option<ZipDownload>,
    pub episodes: Vec<Episode>,
    pub seasons: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_download: Option<DownloadLinks>,
    pub views: i64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for ContentRecord {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let type_str: String = row.try_get("content_type")?;
        let content_type = ContentType::from_str(&type_str).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown content type '{type_str}'").into())
        })?;

        let download: Option<Json<DownloadLinks>> = row.try_get("download")?;
        let zip_download: Option<Json<ZipDownload>> = row.try_get("zip_download")?;
        let episodes: Json<Vec<Episode>> = row.try_get("episodes")?;
        let batch_download: Option<Json<DownloadLinks>> = row.try_get("batch_download")?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content_type,
            category: row.try_get("category")?,
            year: row.try_get("year")?,
            rating: row.try_get("rating")?,
            image: row.try_get("image")?,
            description: row.try_get("description")?,
            duration: row.try_get("duration")?,
            language: row.try_get("language")?,
            quality: row.try_get("quality")?,
            video_url: row.try_get("video_url")?,
            download: download.map(|j| j.0),
            zip_download: zip_download.map(|j| j.0),
            episodes: episodes.0,
            seasons: row.try_get("seasons")?,
            total_episodes: row.try_get("total_episodes")?,
            batch_download: batch_download.map(|j| j.0),
            views: row.try_get("views")?,
            featured: row.try_get("featured")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Raw request body for create/update. Any subset of fields may be present;
/// `id`, `views` and `createdAt` are server-owned and never read from here,
/// and a payload `type` is ignored in favor of the route family's type.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub title: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub language: Option<Vec<String>>,
    pub quality: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub download: Option<DownloadLinks>,
    pub zip_download: Option<ZipDownload>,
    pub episodes: Option<Vec<Episode>>,
    pub seasons: Option<i32>,
    pub total_episodes: Option<i32>,
    pub batch_download: Option<DownloadLinks>,
    pub featured: Option<bool>,
}

/// Payload rejected before reaching the store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Input for creating a content record
#[derive(Debug)]
pub struct CreateContent {
    pub title: String,
    pub content_type: ContentType,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub image: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub language: Vec<String>,
    pub quality: Vec<String>,
    pub video_url: Option<String>,
    pub download: Option<DownloadLinks>,
    pub zip_download: Option<ZipDownload>,
    pub episodes: Vec<Episode>,
    pub seasons: i32,
    pub total_episodes: Option<i32>,
    pub batch_download: Option<DownloadLinks>,
    pub featured: bool,
}

impl CreateContent {
    /// Build a creation command from a request payload, pinning `type` to the
    /// route family regardless of what the payload carried.
    pub fn from_payload(
        payload: ContentPayload,
        content_type: ContentType,
    ) -> Result<Self, CommandError> {
        let title = required_text(payload.title, "title")?;
        let image = required_text(payload.image, "image")?;

        Ok(Self {
            title,
            content_type,
            category: payload.category,
            year: payload.year,
            rating: payload.rating,
            image,
            description: payload.description,
            duration: payload.duration,
            language: payload.language.unwrap_or_default(),
            quality: payload.quality.unwrap_or_default(),
            video_url: payload.video_url,
            download: payload.download,
            zip_download: payload.zip_download,
            episodes: payload.episodes.unwrap_or_default(),
            seasons: payload.seasons.unwrap_or(1),
            total_episodes: payload.total_episodes,
            batch_download: payload.batch_download,
            featured: payload.featured.unwrap_or(false),
        })
    }
}

/// Input for updating a content record. Absent fields are left unchanged;
/// `content_type` is always re-pinned to the route family.
#[derive(Debug)]
pub struct UpdateContent {
    pub content_type: ContentType,
    pub title: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub language: Option<Vec<String>>,
    pub quality: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub download: Option<DownloadLinks>,
    pub zip_download: Option<ZipDownload>,
    pub episodes: Option<Vec<Episode>>,
    pub seasons: Option<i32>,
    pub total_episodes: Option<i32>,
    pub batch_download: Option<DownloadLinks>,
    pub featured: Option<bool>,
}

impl UpdateContent {
    pub fn from_payload(
        payload: ContentPayload,
        content_type: ContentType,
    ) -> Result<Self, CommandError> {
        if matches!(&payload.title, Some(t) if t.trim().is_empty()) {
            return Err(CommandError::Empty("title"));
        }
        if matches!(&payload.image, Some(i) if i.trim().is_empty()) {
            return Err(CommandError::Empty("image"));
        }

        Ok(Self {
            content_type,
            title: payload.title,
            category: payload.category,
            year: payload.year,
            rating: payload.rating,
            image: payload.image,
            description: payload.description,
            duration: payload.duration,
            language: payload.language,
            quality: payload.quality,
            video_url: payload.video_url,
            download: payload.download,
            zip_download: payload.zip_download,
            episodes: payload.episodes,
            seasons: payload.seasons,
            total_episodes: payload.total_episodes,
            batch_download: payload.batch_download,
            featured: payload.featured,
        })
    }
}

/// Filter options for the list operation
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ContentFilter {
    pub fn for_type(content_type: ContentType) -> Self {
        Self {
            content_type: Some(content_type),
            ..Self::default()
        }
    }

    /// Build the WHERE clause and its bind values, numbered from $1.
    /// `category` is a case-insensitive substring match; `search` matches
    /// title or description.
    fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(content_type) = self.content_type {
            binds.push(content_type.as_str().to_string());
            conditions.push(format!("content_type = ${}", binds.len()));
        }
        if let Some(category) = &self.category {
            binds.push(contains_pattern(category));
            conditions.push(format!("category ILIKE ${}", binds.len()));
        }
        if let Some(search) = &self.search {
            binds.push(contains_pattern(search));
            let n = binds.len();
            conditions.push(format!("(title ILIKE ${n} OR description ILIKE ${n})"));
        }

        if conditions.is_empty() {
            ("TRUE".to_string(), binds)
        } else {
            (conditions.join(" AND "), binds)
        }
    }
}

/// A page request. `page` and `limit` are validated at the API boundary
/// and are always >= 1 here.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Result for paginated content queries
#[derive(Debug)]
pub struct ContentPage {
    pub items: Vec<ContentRecord>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ContentPage {
    pub fn new(items: Vec<ContentRecord>, total: i64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            0
        } else {
            (self.total + self.limit - 1) / self.limit
        }
    }
}

/// Content repository for database operations
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List contents matching a filter, most recent first, with the total
    /// count for the same filter ignoring pagination.
    pub async fn list(&self, filter: &ContentFilter, request: &PageRequest) -> Result<ContentPage> {
        let (where_clause, binds) = filter.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM contents WHERE {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT * FROM contents WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2
        );
        let mut list_query = sqlx::query_as::<_, ContentRecord>(&list_sql);
        for value in &binds {
            list_query = list_query.bind(value);
        }
        let items = list_query
            .bind(request.limit)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(ContentPage::new(items, total, request))
    }

    /// Search across title, category, description and languages,
    /// most viewed first, capped at 20.
    pub async fn search(&self, query: &str) -> Result<Vec<ContentRecord>> {
        let pattern = contains_pattern(query);
        let records = sqlx::query_as::<_, ContentRecord>(
            r#"
            SELECT * FROM contents
            WHERE title ILIKE $1
               OR category ILIKE $1
               OR description ILIKE $1
               OR array_to_string(language, ' ') ILIKE $1
            ORDER BY views DESC
            LIMIT 20
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Featured picks: `featured = TRUE`, most viewed first, capped at 6
    pub async fn featured(&self, content_type: Option<ContentType>) -> Result<Vec<ContentRecord>> {
        self.most_viewed(true, content_type).await
    }

    /// Trending picks: most viewed first regardless of the featured flag,
    /// capped at 6
    pub async fn trending(&self, content_type: Option<ContentType>) -> Result<Vec<ContentRecord>> {
        self.most_viewed(false, content_type).await
    }

    async fn most_viewed(
        &self,
        featured_only: bool,
        content_type: Option<ContentType>,
    ) -> Result<Vec<ContentRecord>> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if featured_only {
            conditions.push("featured = TRUE".to_string());
        }
        if let Some(content_type) = content_type {
            binds.push(content_type.as_str().to_string());
            conditions.push(format!("content_type = ${}", binds.len()));
        }

        let where_clause = if conditions.is_empty() {
            "TRUE".to_string()
        } else {
            conditions.join(" AND ")
        };
        let sql =
            format!("SELECT * FROM contents WHERE {where_clause} ORDER BY views DESC LIMIT 6");

        let mut query = sqlx::query_as::<_, ContentRecord>(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let records = query.fetch_all(&self.pool).await?;

        Ok(records)
    }

    /// Fetch a record and count the view, as one in-place increment
    pub async fn record_view(&self, id: Uuid) -> Result<Option<ContentRecord>> {
        let record = sqlx::query_as::<_, ContentRecord>(
            "UPDATE contents SET views = views + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Same as [`record_view`](Self::record_view), but a record of another
    /// type is treated as absent
    pub async fn record_view_for_type(
        &self,
        id: Uuid,
        content_type: ContentType,
    ) -> Result<Option<ContentRecord>> {
        let record = sqlx::query_as::<_, ContentRecord>(
            "UPDATE contents SET views = views + 1 \
             WHERE id = $1 AND content_type = $2 RETURNING *",
        )
        .bind(id)
        .bind(content_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Create a new content record. Id and timestamps are store-assigned;
    /// views start at 0.
    pub async fn create(&self, input: CreateContent) -> Result<ContentRecord> {
        let record = sqlx::query_as::<_, ContentRecord>(
            r#"
            INSERT INTO contents (
                title, content_type, category, year, rating, image, description,
                duration, language, quality, video_url, download, zip_download,
                episodes, seasons, total_episodes, batch_download, featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(input.content_type.as_str())
        .bind(&input.category)
        .bind(input.year)
        .bind(&input.rating)
        .bind(&input.image)
        .bind(&input.description)
        .bind(&input.duration)
        .bind(&input.language)
        .bind(&input.quality)
        .bind(&input.video_url)
        .bind(input.download.as_ref().map(Json))
        .bind(input.zip_download.as_ref().map(Json))
        .bind(Json(&input.episodes))
        .bind(input.seasons)
        .bind(input.total_episodes)
        .bind(input.batch_download.as_ref().map(Json))
        .bind(input.featured)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Update a content record, replacing only the fields the command carries
    pub async fn update(&self, id: Uuid, input: UpdateContent) -> Result<Option<ContentRecord>> {
        let record = sqlx::query_as::<_, ContentRecord>(
            r#"
            UPDATE contents SET
                content_type = $2,
                title = COALESCE($3, title),
                category = COALESCE($4, category),
                year = COALESCE($5, year),
                rating = COALESCE($6, rating),
                image = COALESCE($7, image),
                description = COALESCE($8, description),
                duration = COALESCE($9, duration),
                language = COALESCE($10, language),
                quality = COALESCE($11, quality),
                video_url = COALESCE($12, video_url),
                download = COALESCE($13, download),
                zip_download = COALESCE($14, zip_download),
                episodes = COALESCE($15, episodes),
                seasons = COALESCE($16, seasons),
                total_episodes = COALESCE($17, total_episodes),
                batch_download = COALESCE($18, batch_download),
                featured = COALESCE($19, featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.content_type.as_str())
        .bind(&input.title)
        .bind(&input.category)
        .bind(input.year)
        .bind(&input.rating)
        .bind(&input.image)
        .bind(&input.description)
        .bind(&input.duration)
        .bind(&input.language)
        .bind(&input.quality)
        .bind(&input.video_url)
        .bind(input.download.as_ref().map(Json))
        .bind(input.zip_download.as_ref().map(Json))
        .bind(input.episodes.as_ref().map(Json))
        .bind(input.seasons)
        .bind(input.total_episodes)
        .bind(input.batch_download.as_ref().map(Json))
        .bind(input.featured)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a content record
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count records of one type
    pub async fn count_by_type(&self, content_type: ContentType) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contents WHERE content_type = $1")
                .bind(content_type.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Count all records
    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contents")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// A few recent records, for the debug endpoint
    pub async fn sample(&self, limit: i64) -> Result<Vec<ContentRecord>> {
        let records = sqlx::query_as::<_, ContentRecord>(
            "SELECT * FROM contents ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

/// Turn user text into a contains-pattern, escaping LIKE wildcards so the
/// match stays a literal substring match
fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn required_text(value: Option<String>, name: &'static str) -> Result<String, CommandError> {
    match value {
        None => Err(CommandError::Missing(name)),
        Some(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                Err(CommandError::Empty(name))
            } else {
                Ok(text)
            }
        }
    }
}
