/// User model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL,          -- unique index idx_users_email
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(255) NOT NULL DEFAULT '',
///     last_name VARCHAR(255) NOT NULL DEFAULT '',
///     role VARCHAR(50) NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use crate::auth::password::{self, PasswordError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Role assigned to newly created users
pub const DEFAULT_ROLE: &str = "user";

/// User account
///
/// The password is stored as an Argon2id hash and is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    /// Role name, `"user"` unless changed out of band
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Checks a plaintext password against the stored hash
    pub fn check_password(&self, password: &str) -> Result<bool, PasswordError> {
        password::verify_password(password, &self.password_hash)
    }
}

/// Input for inserting a user
///
/// Carries the already-hashed password; plaintext never reaches the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Full set of mutable user fields written back by an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
