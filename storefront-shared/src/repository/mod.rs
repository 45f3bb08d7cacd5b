/// Data access layer
///
/// One capability trait per entity, each with a Postgres implementer. The
/// repositories are the only code that issues SQL; storage failures are
/// translated here, once, into [`RepoError`] sentinels.
///
/// # Modules
///
/// - `user`: [`UserRepository`] / [`PgUserRepository`]
/// - `product`: [`ProductRepository`] / [`PgProductRepository`]
/// - `order`: [`OrderRepository`] / [`PgOrderRepository`]
/// - `memory`: in-memory implementers for tests (`test-util` feature)
///
/// # Example
///
/// ```no_run
/// use storefront_shared::repository::Repositories;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::postgres(pool);
/// let total = repos.users.count().await?;
/// println!("{} users", total);
/// # Ok(())
/// # }
/// ```

pub mod order;
pub mod product;
pub mod user;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use order::{OrderRepository, PgOrderRepository};
pub use product::{PgProductRepository, ProductRepository};
pub use user::{PgUserRepository, UserRepository};

use sqlx::PgPool;
use std::sync::Arc;

/// Repository result type alias
pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error sentinels
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No row matched the lookup, update or delete
    #[error("resource not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("resource already exists")]
    Conflict,

    /// Any other storage failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepoError::Conflict
            }
            other => RepoError::Database(other),
        }
    }
}

/// All repositories, built over one storage backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool)),
        }
    }

    /// Fresh, empty in-memory repositories
    #[cfg(any(test, feature = "test-util"))]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserRepository::default()),
            products: Arc::new(memory::MemoryProductRepository::default()),
            orders: Arc::new(memory::MemoryOrderRepository::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = RepoError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = RepoError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Database(sqlx::Error::PoolTimedOut)));
        assert!(err.to_string().starts_with("database error"));
    }
}
