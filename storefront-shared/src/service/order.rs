/// Order use cases

use super::{ServiceError, ServiceResult};
use crate::dto::CreateOrder;
use crate::models::{NewOrder, NewOrderItem, Order};
use crate::repository::{OrderRepository, RepoError};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Places a new order
    ///
    /// The order starts as [`crate::models::OrderStatus::Pending`] and its total is derived
    /// from the line items, never taken from the caller.
    ///
    /// # Errors
    ///
    /// `BadRequest` if the total does not fit the stored precision.
    pub async fn create(&self, input: CreateOrder) -> ServiceResult<Order> {
        let items = input
            .products
            .into_iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        let new_order = NewOrder::pending(input.user_id, items)
            .ok_or_else(|| ServiceError::bad_request("order total is too large"))?;

        let order = self
            .repo
            .create(new_order)
            .await
            .map_err(|e| ServiceError::internal("error creating order", e))?;

        info!(
            order_id = order.id,
            user_id = order.user_id,
            total_price = %order.total_price,
            "Order created"
        );
        Ok(order)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Order> {
        self.repo.get_by_id(id).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("order not found"),
            other => ServiceError::internal("error retrieving order", other),
        })
    }

    pub async fn list(&self, offset: i64, limit: i64) -> ServiceResult<Vec<Order>> {
        self.repo
            .list(offset, limit)
            .await
            .map_err(|e| ServiceError::internal("error retrieving orders", e))
    }
}
