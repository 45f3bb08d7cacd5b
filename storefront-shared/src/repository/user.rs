/// User persistence

use super::{RepoError, RepoResult};
use crate::models::{NewUser, User, UserChanges};
use async_trait::async_trait;
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at";

/// Storage operations for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; a taken email yields [`RepoError::Conflict`]
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    async fn get_by_id(&self, id: i64) -> RepoResult<User>;

    async fn get_by_email(&self, email: &str) -> RepoResult<User>;

    /// Writes all of `changes` and bumps `updated_at`
    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<User>;

    /// Deletes a user; zero affected rows yields [`RepoError::NotFound`]
    async fn delete(&self, id: i64) -> RepoResult<()>;

    /// Users ordered by id
    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<User>>;

    async fn count(&self) -> RepoResult<i64>;
}

/// Postgres implementation of [`UserRepository`]
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = created.id, "Inserted user");
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $2, first_name = $3, last_name = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
