/// Request payloads accepted at the HTTP boundary
///
/// These are decoded from JSON and validated with `validator` before a service
/// sees them. Validation messages are client-facing.

use crate::models::pagination::DEFAULT_PER_PAGE;
use crate::models::MAX_UNIT_PRICE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidateEmail, ValidationError};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Empty means "unchanged"; anything else must be an email address
fn email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(error("email", "Must be a valid email address"))
    }
}

/// Largest quantity accepted on a single order line
pub const MAX_QUANTITY: i32 = 1_000_000;

/// Non-negative and small enough for a `NUMERIC(12, 2)` column
fn unit_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(error("range", "Must not be negative"))
    } else if *value > MAX_UNIT_PRICE {
        Err(error("range", "Must not exceed 9999999999.99"))
    } else {
        Ok(())
    }
}

/// `POST /users`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        email(message = "Must be a valid email address"),
        length(max = 255, message = "Must not be longer than 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Must be at least 8 characters long"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub last_name: String,
}

/// `PUT /users/:id`
///
/// Empty or missing fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUser {
    #[validate(
        custom(function = "email_or_empty"),
        length(max = 255, message = "Must not be longer than 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 255, message = "Must not be longer than 255 characters"))]
    pub first_name: String,

    #[validate(length(max = 255, message = "Must not be longer than 255 characters"))]
    pub last_name: String,
}

/// `POST /products`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255, message = "Must be between 1 and 255 characters long"))]
    pub name: String,

    pub description: String,

    #[validate(custom(function = "unit_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Must not be negative"))]
    pub stock: i32,
}

/// `PUT /products/:id`
///
/// Every field is written; missing fields overwrite with their zero value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProduct {
    #[validate(length(max = 255, message = "Must not be longer than 255 characters"))]
    pub name: String,

    pub description: String,

    #[validate(custom(function = "unit_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Must not be negative"))]
    pub stock: i32,
}

/// `POST /orders`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    #[validate(range(min = 1, message = "This field is required"))]
    pub user_id: i64,

    #[validate(length(min = 1, message = "At least one product is required"), nested)]
    pub products: Vec<CreateOrderItem>,
}

/// Single line of `POST /orders`
///
/// The unit price is taken from the request as-is; a missing price counts as zero.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItem {
    #[validate(range(min = 1, message = "This field is required"))]
    pub product_id: i64,

    #[validate(range(min = 1, max = MAX_QUANTITY, message = "Must be between 1 and 1000000"))]
    pub quantity: i32,

    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub price: Decimal,
}

/// `?page=&per_page=` query string
///
/// Unparseable values fall back to the defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Whether the caller asked for a page at all
    pub fn is_requested(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
