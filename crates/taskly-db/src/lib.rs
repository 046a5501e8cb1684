//! # Taskly DB
//!
//! Database pool, migrations and storage abstractions for the Taskly API.
//!
//! - [`store`]: The `UserStore`, `SessionStore` and `TaskStore` traits the
//!   services are written against
//! - [`postgres`]: [`PgStore`], the PostgreSQL implementation
//! - `memory`: `MemoryStore`, an in-process implementation for tests
//!   (feature `test-utils`)
//!
//! # Example
//!
//! ```ignore
//! use taskly_config::DatabaseConfig;
//! use taskly_db::{PgStore, init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//!     run_migrations(&pool).await?;
//!     let store = PgStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod postgres;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod memory;

use sqlx::postgres::PgPoolOptions;
use taskly_config::DatabaseConfig;
use tracing::info;

#[cfg(feature = "test-utils")]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{SessionStore, StoreError, TaskStore, UserStore};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool.
///
/// The acquire timeout bounds how long a request waits for a connection; it
/// is the only timeout applied to store calls.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );
    Ok(pool)
}

/// Applies the SQL migrations embedded from `migrations/` at the repository
/// root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
