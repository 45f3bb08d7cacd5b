/// Persistence connector
///
/// Opens the application database (creating it when missing), manages the
/// connection pool, and applies the schema.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Database bootstrap and schema migrations
///
/// # Example
///
/// ```no_run
/// use storefront_shared::config::Config;
/// use storefront_shared::db;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::load()?;
/// let pool = db::open(&config.database).await?;
/// db::migrations::run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;

use crate::config::DatabaseConfig;
use sqlx::PgPool;

/// Ensures the target database exists, then returns a checked connection pool
///
/// # Errors
///
/// Any failure is returned as-is; callers treat it as fatal to startup.
pub async fn open(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    migrations::ensure_database_exists(config).await?;
    pool::create_pool(config).await
}
