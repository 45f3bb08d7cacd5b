//! Shared helpers for the PostgreSQL-backed integration tests
//!
//! Connection settings come from the usual `APP_DATABASE_*` variables. The
//! database name defaults to `storefront_test` so a developer database is
//! never touched by accident.
//!
//! Run with: cargo test -p storefront-shared -- --ignored --test-threads=1

#![allow(dead_code)]

use chrono::Utc;
use sqlx::PgPool;
use std::env;
use storefront_shared::config::{Config, DatabaseConfig};
use storefront_shared::db;

pub fn test_database_config() -> DatabaseConfig {
    let mut config = Config::load()
        .expect("Failed to load configuration")
        .database;

    config.name = env::var("APP_TEST_DATABASE_NAME").unwrap_or_else(|_| "storefront_test".to_string());
    config.max_connections = 5;
    config.min_connections = 1;
    config.connect_timeout_seconds = 10;
    config
}

/// Opens the test database with the schema applied
pub async fn setup_pool() -> PgPool {
    let pool = db::open(&test_database_config())
        .await
        .expect("Failed to open test database");
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Email address no other test run will produce
pub fn unique_email(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}@example.com", prefix, nanos)
}
