//! Startup schema creation
//!
//! The contents table is created in code at startup rather than through
//! migration files. Statements are idempotent; an existing table is left
//! untouched.

use anyhow::Result;
use sqlx::PgPool;
use tracing::debug;

const CREATE_CONTENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    content_type TEXT NOT NULL CHECK (content_type IN ('movie', 'anime', 'webseries')),
    category TEXT,
    year INT,
    rating TEXT,
    image TEXT NOT NULL,
    description TEXT,
    duration TEXT,
    language TEXT[] NOT NULL DEFAULT '{}',
    quality TEXT[] NOT NULL DEFAULT '{}',
    video_url TEXT,
    download JSONB,
    zip_download JSONB,
    episodes JSONB NOT NULL DEFAULT '[]'::jsonb,
    seasons INT NOT NULL DEFAULT 1,
    total_episodes INT,
    batch_download JSONB,
    views BIGINT NOT NULL DEFAULT 0,
    featured BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_contents_type ON contents (content_type)",
    "CREATE INDEX IF NOT EXISTS idx_contents_created_at ON contents (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_contents_views ON contents (views DESC)",
    "CREATE INDEX IF NOT EXISTS idx_contents_featured ON contents (featured) WHERE featured",
];

/// Create the contents table and its indexes if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_CONTENTS_TABLE).execute(pool).await?;
    debug!("contents table ready");

    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("contents indexes ready");

    Ok(())
}
