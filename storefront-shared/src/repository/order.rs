/// Order persistence
///
/// Orders are stored across `orders` and `order_items`. Creation writes both in
/// one transaction; reads attach the items to each fetched order.

use super::{RepoError, RepoResult};
use crate::models::{NewOrder, Order, OrderItem, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;

const ORDER_COLUMNS: &str = "id, user_id, total_price, status, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

/// Storage operations for orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order and its items atomically
    async fn create(&self, order: NewOrder) -> RepoResult<Order>;

    async fn get_by_id(&self, id: i64) -> RepoResult<Order>;

    /// Orders ordered by id, items included
    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Order>>;
}

/// `orders` row before items are attached
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepoResult<Order> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e| RepoError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items,
            total_price: self.total_price,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Postgres implementation of [`OrderRepository`]
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads items for the given orders, grouped by order id
    async fn items_for(&self, order_ids: &[i64]) -> RepoResult<HashMap<i64, Vec<OrderItem>>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.order_id).or_default().push(item);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> RepoResult<Order> {
        let total_price = order.total_price;
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (user_id, total_price, status)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.user_id)
        .bind(total_price)
        .bind(order.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let inserted = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(inserted);
        }

        tx.commit().await?;

        tracing::debug!(order_id = row.id, items = items.len(), "Inserted order");
        row.into_order(items)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let items = self.items_for(&[row.id]).await?.remove(&row.id).unwrap_or_default();
        row.into_order(items)
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }
}
