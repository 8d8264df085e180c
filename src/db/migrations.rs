// db/migrations.rs
use sqlx::{Pool, Postgres};

/// Idempotent schema bootstrap. Each migration runs once, tracked in
/// `_migrations`; the DDL files themselves are also written to be re-runnable.
pub async fn run_migrations(pool: &Pool<Postgres>) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    apply(pool, "001_init", include_str!("../../migrations/001_init.sql")).await?;

    tracing::info!("Database migrations up to date");
    Ok(())
}

async fn apply(pool: &Pool<Postgres>, name: &str, sql: &str) -> anyhow::Result<()> {
    let applied: bool =
        sqlx::query_scalar("SELECT COUNT(*) > 0 FROM _migrations WHERE name = $1")
            .bind(name)
            .fetch_one(pool)
            .await?;

    if !applied {
        sqlx::raw_sql(sql).execute(pool).await?;
        sqlx::query("INSERT INTO _migrations (name) VALUES ($1)")
            .bind(name)
            .execute(pool)
            .await?;
        tracing::info!("Applied migration: {}", name);
    }

    Ok(())
}
