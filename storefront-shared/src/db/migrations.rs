/// Schema setup and database bootstrap
///
/// Migrations live in the `migrations/` directory at the workspace root and are
/// embedded at compile time with `sqlx::migrate!`. Every statement uses
/// `IF NOT EXISTS`, and sqlx records applied versions in `_sqlx_migrations`,
/// so running them on every startup is safe.
///
/// # Example
///
/// ```no_run
/// use storefront_shared::config::DatabaseConfig;
/// use storefront_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use storefront_shared::db::pool::create_pool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig::default();
/// ensure_database_exists(&config).await?;
///
/// let pool = create_pool(&config).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPool, Connection, PgConnection};
use tracing::{debug, info, warn};

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,
}

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is lost.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version)
         FROM _sqlx_migrations
         WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    debug!(
        applied_migrations = count,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
    })
}

/// Creates the application database if it doesn't exist
///
/// Connects to the `postgres` maintenance database on the same server, checks
/// `pg_database` and only issues `CREATE DATABASE` when the name is absent.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot connect to the PostgreSQL server
/// - Don't have permission to create databases
pub async fn ensure_database_exists(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
    info!(database = %config.name, "Checking if database exists");

    let options = config
        .maintenance_options()
        .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;
    let mut conn = PgConnection::connect_with(&options).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.name)
            .fetch_one(&mut conn)
            .await?;

    if exists {
        debug!(database = %config.name, "Database already exists");
    } else {
        info!(database = %config.name, "Database does not exist, creating it");
        // Identifiers cannot be bound as parameters
        sqlx::query(&format!("CREATE DATABASE {}", quote_identifier(&config.name)))
            .execute(&mut conn)
            .await?;
        info!(database = %config.name, "Database created successfully");
    }

    conn.close().await?;
    Ok(())
}

/// Quotes a Postgres identifier, doubling embedded quotes
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
