pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use parish_core::errors::ParishError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Wraps a driver error for functions that report domain errors.
pub(crate) fn db_error(err: sqlx::Error) -> ParishError {
    ParishError::Database(err.into())
}

/// True when the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
