/// Product use cases

use super::{ServiceError, ServiceResult};
use crate::dto::{CreateProduct, UpdateProduct};
use crate::models::{NewProduct, Pagination, Product, ProductChanges};
use crate::repository::{ProductRepository, RepoError};
use std::sync::Arc;
use tracing::info;

/// One page of products with the total row count
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateProduct) -> ServiceResult<Product> {
        let product = self
            .repo
            .create(NewProduct {
                name: input.name,
                description: input.description,
                price: input.price,
                stock: input.stock,
            })
            .await
            .map_err(|e| ServiceError::internal("error creating product", e))?;

        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Product> {
        self.repo.get_by_id(id).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("product not found"),
            other => ServiceError::internal("error retrieving product", other),
        })
    }

    /// Every product, ordered by id
    pub async fn list_all(&self) -> ServiceResult<Vec<Product>> {
        self.repo
            .list_all()
            .await
            .map_err(|e| ServiceError::internal("error retrieving products", e))
    }

    /// One page of products plus the overall count
    pub async fn list(&self, page: i64, per_page: i64) -> ServiceResult<ProductPage> {
        let pagination = Pagination::new(page, per_page);

        let products = self
            .repo
            .list(pagination.offset(), pagination.limit())
            .await
            .map_err(|e| ServiceError::internal("error retrieving products", e))?;

        let total = self
            .repo
            .count()
            .await
            .map_err(|e| ServiceError::internal("error counting products", e))?;

        Ok(ProductPage {
            products,
            total,
            pagination,
        })
    }

    /// Overwrites all four mutable fields
    pub async fn update(&self, id: i64, input: UpdateProduct) -> ServiceResult<Product> {
        let changes = ProductChanges {
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
        };

        self.repo.update(id, changes).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("product not found"),
            other => ServiceError::internal("error updating product", other),
        })
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("product not found"),
            other => ServiceError::internal("error deleting product", other),
        })?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryProductRepository;
    use crate::service::ErrorKind;
    use rust_decimal::Decimal;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryProductRepository::default()))
    }

    fn widget() -> CreateProduct {
        CreateProduct {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 5,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();

        let created = service.create(widget()).await.unwrap();
        let fetched = service.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, Decimal::new(999, 2));
        assert_eq!(fetched.stock, 5);
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let service = service();
        let created = service.create(widget()).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateProduct {
                    name: "Gadget".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description, "");
        assert_eq!(updated.price, Decimal::ZERO);
        assert_eq!(updated.stock, 0);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let service = service();

        assert_eq!(service.get_by_id(7).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            service
                .update(7, UpdateProduct::default())
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(service.delete(7).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        let created = service.create(widget()).await.unwrap();

        service.delete(created.id).await.unwrap();
        let err = service.delete(created.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.public_message(), "product not found");
    }

    #[tokio::test]
    async fn test_list_all_and_paged_list() {
        let service = service();
        for _ in 0..3 {
            service.create(widget()).await.unwrap();
        }

        assert_eq!(service.list_all().await.unwrap().len(), 3);

        let page = service.list(2, 2).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id, 3);
        assert_eq!(page.total, 3);
        assert_eq!(page.pagination.total_pages(page.total), 2);
    }
}
