//! Schema bootstrap.
//!
//! Idempotent DDL run once on connect. Later columns are added with
//! `ADD COLUMN IF NOT EXISTS` so older databases pick them up.

use anyhow::{Context, Result};
use tokio_postgres::Client;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS lesson_plans (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT REFERENCES users(id),
    persona TEXT NOT NULL,
    goals TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS posts (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    author_name TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    topic TEXT NOT NULL,
    likes INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS contact_submissions (
    id BIGSERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
ALTER TABLE lesson_plans ADD COLUMN IF NOT EXISTS current_lesson_index INTEGER DEFAULT 0;
ALTER TABLE contact_submissions ADD COLUMN IF NOT EXISTS user_id BIGINT REFERENCES users(id);
CREATE INDEX IF NOT EXISTS lesson_plans_user_created_idx ON lesson_plans (user_id, created_at DESC);
"#;

/// Create missing tables and columns
pub async fn init_schema(client: &Client) -> Result<()> {
    tracing::info!("Initializing database schema...");

    client
        .batch_execute(SCHEMA)
        .await
        .context("Failed to initialize schema")?;

    tracing::info!("Schema initialized successfully");
    Ok(())
}
