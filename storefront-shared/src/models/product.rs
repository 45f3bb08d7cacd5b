/// Product model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
///     stock INTEGER NOT NULL CHECK (stock >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Largest value a `NUMERIC(12, 2)` price column holds: 9999999999.99
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Catalog product
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,

    /// Unit price, serialized as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Units on hand
    pub stock: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Replacement values for every mutable product field
///
/// Product updates always overwrite all four fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_serializes_as_number() {
        let product = Product {
            id: 1,
            name: "A".to_string(),
            description: "d".to_string(),
            price: Decimal::from_str("9.99").unwrap(),
            stock: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"].as_f64(), Some(9.99));
        assert_eq!(json["stock"], 5);
    }
}
