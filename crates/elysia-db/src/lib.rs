//! # Elysia DB
//!
//! PostgreSQL connection pool and embedded schema migrations.
//!
//! ```ignore
//! use elysia_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Connects a pool. The returned pool is cheaply cloneable.
///
/// # Errors
///
/// Returns the driver error if the database cannot be reached.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies the migrations under `migrations/` that have not run yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
