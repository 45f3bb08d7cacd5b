/// Integration tests for database bootstrap and migrations
///
/// These tests require a running PostgreSQL server and are ignored by default.
/// Run with: cargo test -p storefront-shared --test db_migrations_tests -- --ignored --test-threads=1

mod common;

use common::test_database_config;
use storefront_shared::db::migrations::{
    ensure_database_exists, get_migration_status, run_migrations,
};
use storefront_shared::db::pool::{close_pool, create_pool};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_ensure_database_exists_is_repeatable() {
    let config = test_database_config();

    // Succeeds whether or not the database already exists
    ensure_database_exists(&config).await.expect("First call failed");
    ensure_database_exists(&config).await.expect("Second call failed");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_migrations_are_idempotent() {
    let config = test_database_config();
    ensure_database_exists(&config).await.expect("Failed to create database");
    let pool = create_pool(&config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("First migration run failed");
    let first = get_migration_status(&pool).await.expect("Failed to get status");

    run_migrations(&pool).await.expect("Second migration run failed");
    let second = get_migration_status(&pool).await.expect("Failed to get status");

    assert!(first.applied_migrations > 0, "No migrations were applied");
    assert_eq!(first.applied_migrations, second.applied_migrations);
    assert_eq!(first.latest_version, second.latest_version);

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_schema_tables_exist() {
    let config = test_database_config();
    ensure_database_exists(&config).await.expect("Failed to create database");
    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");

    for table in ["users", "products", "orders", "order_items"] {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Failed to query information_schema");

        assert!(exists, "Table {} should exist", table);
    }

    close_pool(pool).await;
}
