/// Integration tests for the database connection pool
///
/// These tests require a running PostgreSQL server and are ignored by default.
/// Run with: cargo test -p storefront-shared --test db_pool_tests -- --ignored

mod common;

use common::{setup_pool, test_database_config};
use storefront_shared::config::DatabaseConfig;
use storefront_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_pool_success() {
    let pool = setup_pool().await;

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections > 0, "Pool should have at least one connection");

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_pool_with_unreachable_host() {
    let config = DatabaseConfig {
        host: "nonexistent.invalid".to_string(),
        max_connections: 1,
        min_connections: 0,
        connect_timeout_seconds: 2,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
        ..Default::default()
    };

    let result = create_pool(&config).await;
    assert!(result.is_err(), "Should fail with an unreachable host");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_health_check_success() {
    let pool = create_pool(&test_database_config())
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pool_concurrent_queries() {
    let pool = setup_pool().await;

    // More tasks than connections, so some have to queue
    let mut handles = vec![];
    for i in 0..20i64 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let row: (i64,) = sqlx::query_as("SELECT $1::bigint")
                .bind(i)
                .fetch_one(&pool)
                .await
                .expect("Failed to execute query");
            assert_eq!(row.0, i);
        }));
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    close_pool(pool).await;
}
