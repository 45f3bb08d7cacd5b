/// Product endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/products` - Create a product
/// - `GET /api/v1/products` - List all products (or one page with `?page=&per_page=`)
/// - `GET /api/v1/products/:id` - Get a product
/// - `PUT /api/v1/products/:id` - Replace every field of a product
/// - `DELETE /api/v1/products/:id` - Delete a product

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ValidatedJson},
    response::{PaginationMeta, Reply},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use storefront_shared::{
    dto::{CreateProduct, PageQuery, UpdateProduct},
    models::Product,
};

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateProduct>,
) -> ApiResult<Reply<Product>> {
    let product = state.services.products.create(req).await?;
    Ok(Reply::created(product))
}

/// List products handler
///
/// Without pagination parameters the whole catalog is returned and no `meta`
/// is attached.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Reply<Vec<Product>>> {
    if !query.is_requested() {
        let products = state.services.products.list_all().await?;
        return Ok(Reply::ok(products));
    }

    let page = state
        .services
        .products
        .list(query.page(), query.per_page())
        .await?;

    let meta = PaginationMeta::new(page.pagination, page.total);
    Ok(Reply::paginated(page.products, meta))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<Product>> {
    let id = parse_id(&id, "product")?;
    let product = state.services.products.get_by_id(id).await?;
    Ok(Reply::ok(product))
}

/// Update product handler
///
/// Fields missing from the body are written as their zero value.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateProduct>,
) -> ApiResult<Reply<Product>> {
    let id = parse_id(&id, "product")?;
    let product = state.services.products.update(id, req).await?;
    Ok(Reply::ok(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "product")?;
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
