/// Business logic
///
/// Services compose repository calls per use case and translate
/// [`RepoError`](crate::repository::RepoError) into the API-facing
/// [`ServiceError`] taxonomy. They hold no state beyond their repository handle.
///
/// # Modules
///
/// - `user`: uniqueness-by-email, password hashing, selective updates, paging
/// - `product`: catalog CRUD with full-overwrite updates
/// - `order`: order placement and lookup

pub mod order;
pub mod product;
pub mod user;

pub use order::OrderService;
pub use product::ProductService;
pub use user::UserService;

use crate::repository::Repositories;
use std::fmt;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error category with a stable tag and HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,

    /// Request exceeded its deadline; raised at the HTTP edge, never by a service
    Timeout,

    Server,
}

impl ErrorKind {
    /// Stable machine-readable tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Timeout => "REQUEST_TIMEOUT",
            ErrorKind::Server => "SERVER_ERROR",
        }
    }

    /// HTTP status code for this category
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Timeout => 408,
            ErrorKind::Server => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-facing service error
///
/// Internal errors keep their cause for logging; only the message reaches clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    BadRequest {
        message: String,
        field: Option<String>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}: {source}")]
    Internal {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            field: None,
        }
    }

    /// Bad request attributed to one input field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    /// Server error wrapping an underlying cause
    pub fn internal<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ServiceError::Internal {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::BadRequest { .. } => ErrorKind::BadRequest,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Internal { .. } => ErrorKind::Server,
        }
    }

    /// Client-facing message, without the internal cause chain
    pub fn public_message(&self) -> &str {
        match self {
            ServiceError::BadRequest { message, .. } | ServiceError::Internal { message, .. } => {
                message
            }
            ServiceError::Unauthorized(message)
            | ServiceError::Forbidden(message)
            | ServiceError::NotFound(message)
            | ServiceError::Conflict(message) => message,
        }
    }

    /// Input field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ServiceError::BadRequest { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

/// All services, built over one set of repositories
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub products: ProductService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users),
            products: ProductService::new(repos.products),
            orders: OrderService::new(repos.orders),
        }
    }
}
