/// Order endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/orders` - Place an order
/// - `GET /api/v1/orders` - List the first ten orders
/// - `GET /api/v1/orders/:id` - Get an order with its items
///
/// Item prices are taken from the request; products and stock are not checked.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ValidatedJson},
    response::Reply,
};
use axum::extract::{Path, State};
use storefront_shared::{dto::CreateOrder, models::Order};

/// `GET /orders` ignores pagination parameters
const LIST_OFFSET: i64 = 0;
const LIST_LIMIT: i64 = 10;

/// Create order handler
///
/// The order starts as `pending`; `total_price` is computed from the items.
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrder>,
) -> ApiResult<Reply<Order>> {
    let order = state.services.orders.create(req).await?;
    Ok(Reply::created(order))
}

pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Reply<Vec<Order>>> {
    let orders = state.services.orders.list(LIST_OFFSET, LIST_LIMIT).await?;
    Ok(Reply::ok(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<Order>> {
    let id = parse_id(&id, "order")?;
    let order = state.services.orders.get_by_id(id).await?;
    Ok(Reply::ok(order))
}
