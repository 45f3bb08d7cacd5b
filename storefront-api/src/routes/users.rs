/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/users` - Create a user
/// - `GET /api/v1/users?page=&per_page=` - List users, paginated
/// - `GET /api/v1/users/:id` - Get a user
/// - `PUT /api/v1/users/:id` - Update a user (empty fields are left unchanged)
/// - `DELETE /api/v1/users/:id` - Delete a user
///
/// Password hashes are never serialized.

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
    dto::{CreateUser, PageQuery, UpdateUser},
    models::User,
};

/// Create user handler
///
/// # Errors
///
/// - `400 Bad Request`: Invalid body or validation failure
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUser>,
) -> ApiResult<Reply<User>> {
    let user = state.services.users.create(req).await?;
    Ok(Reply::created(user))
}

/// List users handler
///
/// Out-of-range `page` / `per_page` values fall back to 1 and 10.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Reply<Vec<User>>> {
    let page = state
        .services
        .users
        .list(query.page(), query.per_page())
        .await?;

    let meta = PaginationMeta::new(page.pagination, page.total);
    Ok(Reply::paginated(page.users, meta))
}

/// Get user handler
///
/// # Errors
///
/// - `400 Bad Request`: Id is not an unsigned integer
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<User>> {
    let id = parse_id(&id, "user")?;
    let user = state.services.users.get_by_id(id).await?;
    Ok(Reply::ok(user))
}

/// Update user handler
///
/// # Errors
///
/// - `400 Bad Request`: Invalid id or body
/// - `404 Not Found`: No such user
/// - `409 Conflict`: New email belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUser>,
) -> ApiResult<Reply<User>> {
    let id = parse_id(&id, "user")?;
    let user = state.services.users.update(id, req).await?;
    Ok(Reply::ok(user))
}

/// Delete user handler
///
/// Returns `204 No Content`; deleting a missing user is `404`.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "user")?;
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
