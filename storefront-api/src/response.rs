/// Response envelope
///
/// Every JSON body the API produces has the same outer shape:
/// `{success, data?, error?, meta?}`. Absent members are omitted.

use crate::error::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use storefront_shared::models::Pagination;

/// Response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn paginated(data: T, meta: PaginationMeta) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }

    pub fn error(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            meta: None,
        }
    }
}

/// A status code paired with an enveloped body
pub struct Reply<T>(pub StatusCode, pub ApiResponse<T>);

impl<T> Reply<T> {
    /// `200 OK`
    pub fn ok(data: T) -> Self {
        Reply(StatusCode::OK, ApiResponse::success(data))
    }

    /// `201 Created`
    pub fn created(data: T) -> Self {
        Reply(StatusCode::CREATED, ApiResponse::success(data))
    }

    /// `200 OK` with pagination metadata
    pub fn paginated(data: T, meta: PaginationMeta) -> Self {
        Reply(StatusCode::OK, ApiResponse::paginated(data, meta))
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
