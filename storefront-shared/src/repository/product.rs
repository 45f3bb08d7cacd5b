/// Product persistence

use super::{RepoError, RepoResult};
use crate::models::{NewProduct, Product, ProductChanges};
use async_trait::async_trait;
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, created_at, updated_at";

/// Storage operations for products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> RepoResult<Product>;

    async fn get_by_id(&self, id: i64) -> RepoResult<Product>;

    /// Every product, ordered by id
    async fn list_all(&self) -> RepoResult<Vec<Product>>;

    /// One page of products, ordered by id
    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Product>>;

    /// Overwrites all mutable fields and bumps `updated_at`
    async fn update(&self, id: i64, changes: ProductChanges) -> RepoResult<Product>;

    /// Deletes a product; zero affected rows yields [`RepoError::NotFound`]
    async fn delete(&self, id: i64) -> RepoResult<()>;

    async fn count(&self) -> RepoResult<i64>;
}

/// Postgres implementation of [`ProductRepository`]
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> RepoResult<Product> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(product_id = created.id, "Inserted product");
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_all(&self) -> RepoResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list(&self, offset: i64, limit: i64) -> RepoResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> RepoResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
