/// Error handling for the API server
///
/// Every failure leaves the server in the same envelope:
///
/// ```json
/// {
///   "success": false,
///   "error": {
///     "type": "NOT_FOUND",
///     "errors": [{ "message": "user not found" }],
///     "status_code": 404
///   }
/// }
/// ```
///
/// Handlers return [`ApiResult`]; service errors convert with `?`.
///
/// # Example
///
/// ```no_run
/// use storefront_api::error::{ApiError, ApiResult};
///
/// async fn handler() -> ApiResult<()> {
///     Err(ApiError::NotFound("user not found".to_string()))
/// }
/// ```

use crate::response::ApiResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum::BoxError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use storefront_shared::service::{ErrorKind, ServiceError};
use tower::timeout::error::Elapsed;
use validator::{ValidationErrors, ValidationErrorsKind};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Bad request (400) with one entry per offending field
    ValidationError(Vec<ErrorItem>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email
    Conflict(String),

    /// Request timeout (408)
    Timeout(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Single error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    /// Input field the message refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Human-readable message
    pub message: String,
}

impl ErrorItem {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// `error` member of the response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable type tag, e.g. `NOT_FOUND`
    #[serde(rename = "type")]
    pub error_type: String,

    pub errors: Vec<ErrorItem>,

    pub status_code: u16,
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => ErrorKind::BadRequest,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Timeout(_) => ErrorKind::Timeout,
            ApiError::InternalError(_) => ErrorKind::Server,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Builds the `error` member of the envelope
    pub fn to_body(&self) -> ErrorBody {
        let errors = match self {
            ApiError::ValidationError(items) => items.clone(),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Timeout(msg)
            | ApiError::InternalError(msg) => vec![ErrorItem::new(msg.clone())],
        };

        ErrorBody {
            error_type: self.kind().as_str().to_string(),
            errors,
            status_code: self.kind().status_code(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<()> = ApiResponse::error(self.to_body());

        (status, Json(body)).into_response()
    }
}

/// Maps a failure from the router's middleware stack to an envelope
///
/// Used with `HandleErrorLayer`; an elapsed deadline is `REQUEST_TIMEOUT`,
/// anything else is a server error.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout("request timed out".to_string())
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::InternalError("internal server error".to_string())
    }
}

/// Turns a handler panic into a `SERVER_ERROR` envelope
///
/// Used with tower-http's `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Handler panicked");

    ApiError::InternalError("internal server error".to_string()).into_response()
}

/// Convert service errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::BadRequest {
                message,
                field: Some(field),
            } => ApiError::ValidationError(vec![ErrorItem {
                field: Some(field),
                message,
            }]),
            ServiceError::BadRequest { message, field: None } => ApiError::BadRequest(message),
            ServiceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Internal { .. } => {
                // Log the full cause chain but only expose the message
                tracing::error!(error = %err, "Internal error");
                ApiError::InternalError(err.public_message().to_string())
            }
        }
    }
}

/// Convert `validator` failures to per-field API errors
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut items = Vec::new();
        collect_validation_errors(&errors, None, &mut items);
        items.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(items)
    }
}

/// Flattens nested validation errors into `parent.child` / `list[i].child` paths
fn collect_validation_errors(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<ErrorItem>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| ErrorItem {
                    field: Some(path.clone()),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_errors(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    let indexed = format!("{}[{}]", path, index);
                    collect_validation_errors(nested, Some(&indexed), out);
                }
            }
        }
    }
}
