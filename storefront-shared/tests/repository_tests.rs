/// Integration tests for the Postgres repositories
///
/// These tests require a running PostgreSQL server and are ignored by default.
/// Run with: cargo test -p storefront-shared --test repository_tests -- --ignored

mod common;

use common::{setup_pool, unique_email};
use rust_decimal::Decimal;
use storefront_shared::models::{
    NewOrder, NewOrderItem, NewProduct, NewUser, OrderStatus, ProductChanges, UserChanges,
};
use storefront_shared::repository::{RepoError, Repositories};

fn new_user(email: String) -> NewUser {
    NewUser {
        email,
        password_hash: "$argon2id$placeholder".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: "user".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_user_round_trip_and_unique_email() {
    let repos = Repositories::postgres(setup_pool().await);
    let email = unique_email("repo-user");

    let created = repos.users.create(new_user(email.clone())).await.unwrap();
    assert_eq!(created.role, "user");

    let by_email = repos.users.get_by_email(&email).await.unwrap();
    assert_eq!(by_email.id, created.id);

    let duplicate = repos.users.create(new_user(email.clone())).await;
    assert!(matches!(duplicate, Err(RepoError::Conflict)));

    let updated = repos
        .users
        .update(
            created.id,
            UserChanges {
                email: email.clone(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Grace");
    assert!(updated.updated_at >= created.updated_at);

    repos.users.delete(created.id).await.unwrap();
    assert!(matches!(
        repos.users.delete(created.id).await,
        Err(RepoError::NotFound)
    ));
    assert!(repos.users.get_by_id(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_product_update_overwrites_and_missing_is_not_found() {
    let repos = Repositories::postgres(setup_pool().await);

    let created = repos
        .products
        .create(NewProduct {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 5,
        })
        .await
        .unwrap();
    assert_eq!(created.price, Decimal::new(999, 2));

    let changes = ProductChanges {
        name: "Gadget".to_string(),
        description: String::new(),
        price: Decimal::ZERO,
        stock: 0,
    };
    let updated = repos.products.update(created.id, changes.clone()).await.unwrap();
    assert_eq!(updated.name, "Gadget");
    assert_eq!(updated.stock, 0);

    repos.products.delete(created.id).await.unwrap();
    assert!(matches!(
        repos.products.update(created.id, changes).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_order_create_persists_items_and_total() {
    let repos = Repositories::postgres(setup_pool().await);

    let order = repos
        .orders
        .create(
            NewOrder::pending(
                1,
                vec![
                    NewOrderItem {
                        product_id: 1,
                        quantity: 2,
                        price: Decimal::new(1050, 2),
                    },
                    NewOrderItem {
                        product_id: 2,
                        quantity: 1,
                        price: Decimal::new(300, 2),
                    },
                ],
            )
            .unwrap(),
        )
        .await
        .unwrap();

    let fetched = repos.orders.get_by_id(order.id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.total_price, Decimal::new(2400, 2));
    assert_eq!(fetched.items, order.items);

    let listed = repos.orders.list(0, 10).await.unwrap();
    assert!(listed.len() <= 10);
}
