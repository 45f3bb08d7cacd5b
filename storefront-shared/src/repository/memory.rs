/// In-memory repositories
///
/// Test doubles for the service and HTTP layers. They mirror the Postgres
/// semantics callers rely on: ids are assigned sequentially from 1, a taken
/// email is a [`RepoError::Conflict`], and missing rows are
/// [`RepoError::NotFound`].

use super::{OrderRepository, ProductRepository, RepoError, RepoResult, UserRepository};
use crate::models::{
    NewOrder, NewProduct, NewUser, Order, OrderItem, Product, ProductChanges, User, UserChanges,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

fn page<T: Clone>(rows: &BTreeMap<i64, T>, offset: i64, limit: i64) -> Vec<T> {
    rows.values()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

// Derived Default would require `T: Default`
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`UserRepository`]
#[derive(Default)]
pub struct MemoryUserRepository {
    table: Mutex<Table<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict);
        }

        let now = Utc::now();
        let created = User {
            id: table.allocate_id(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<User> {
        self.table.lock().await.rows.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<User> {
        self.table
            .lock()
            .await
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<User> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|u| u.id != id && u.email == changes.email) {
            return Err(RepoError::Conflict);
        }

        let user = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.email = changes.email;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<User>> {
        Ok(page(&self.table.lock().await.rows, offset, limit))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.table.lock().await.rows.len() as i64)
    }
}

/// In-memory [`ProductRepository`]
#[derive(Default)]
pub struct MemoryProductRepository {
    table: Mutex<Table<Product>>,
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: NewProduct) -> RepoResult<Product> {
        let mut table = self.table.lock().await;
        let now = Utc::now();
        let created = Product {
            id: table.allocate_id(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Product> {
        self.table.lock().await.rows.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn list_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Product>> {
        Ok(page(&self.table.lock().await.rows, offset, limit))
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> RepoResult<Product> {
        let mut table = self.table.lock().await;
        let product = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        product.name = changes.name;
        product.description = changes.description;
        product.price = changes.price;
        product.stock = changes.stock;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.table.lock().await.rows.len() as i64)
    }
}

/// In-memory [`OrderRepository`]
#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: Mutex<Table<Order>>,
    next_item_id: Mutex<i64>,
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> RepoResult<Order> {
        let total_price = order.total_price;
        let mut table = self.orders.lock().await;
        let mut next_item_id = self.next_item_id.lock().await;
        let order_id = table.allocate_id();

        let items = order
            .items
            .into_iter()
            .map(|item| {
                *next_item_id += 1;
                OrderItem {
                    id: *next_item_id,
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                }
            })
            .collect();

        let now = Utc::now();
        let created = Order {
            id: order_id,
            user_id: order.user_id,
            items,
            total_price,
            status: order.status,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(order_id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Order> {
        self.orders.lock().await.rows.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Order>> {
        Ok(page(&self.orders.lock().await.rows, offset, limit))
    }
}
