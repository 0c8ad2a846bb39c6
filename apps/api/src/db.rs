use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const CREATE_WRITING_STYLES: &str = "CREATE TABLE IF NOT EXISTS writing_styles (
    email TEXT PRIMARY KEY,
    data JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_USER_PROFILES: &str = "CREATE TABLE IF NOT EXISTS user_profiles (
    email TEXT PRIMARY KEY,
    data JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Creates the blob tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in [CREATE_WRITING_STYLES, CREATE_USER_PROFILES] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create table")?;
    }
    info!("Database schema ready");
    Ok(())
}
