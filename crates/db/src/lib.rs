//! Persistence layer for the Spotlight selection engine.
//!
//! Entity models and DTOs live under [`models`], zero-sized repository
//! structs with async methods under [`repositories`]. Every multi-step
//! mutation (pinning, subscription expiry, schedule writes, cursor-advancing
//! selection) runs in a single transaction that first locks the owning
//! content item row, so all operations on one content item are serialized
//! while different content items proceed in parallel.

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{DbError, DbResult};

/// Convenience alias for the PostgreSQL connection pool.
pub type DbPool = sqlx::PgPool;

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by startup and the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
