use crate::domain::DomainError;
use crate::infrastructure::config::AppConfig;
use anyhow::Context;
use sqlx::postgres::{PgDatabaseError, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use tracing::error;

/// Builds the connection pool and applies pending migrations.
pub async fn connect_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_pool_size)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    Ok(pool)
}

/// True when `err` is a Postgres unique violation (23505) on the named
/// constraint or unique index.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>() {
            return pg_err.code() == "23505" && pg_err.constraint() == Some(constraint);
        }
    }
    false
}

/// Anything the repositories did not map to a domain kind is logged here
/// and surfaced as `Unexpected` with no internal detail attached.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    error!("database error: {}", err);
    DomainError::unexpected(err)
}
