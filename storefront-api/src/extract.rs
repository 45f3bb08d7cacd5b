/// Request extractors
///
/// - [`ValidatedJson`]: JSON body that has passed `validator` checks
/// - [`parse_id`]: path id parsing with the API's error envelope

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body decoded into `T` and validated
///
/// Decode failures and validation failures are both reported as `BAD_REQUEST`
/// in the standard envelope, never as axum's plain-text rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection, "Rejected request body");
                ApiError::BadRequest(format!("invalid input: {}", rejection.body_text()))
            })?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Parses a path id as an unsigned integer
///
/// `resource` names the entity in the error message, e.g. `invalid user ID`.
///
/// # Errors
///
/// Returns `BAD_REQUEST` if `raw` is not an unsigned integer that fits the id column.
pub fn parse_id(raw: &str, resource: &str) -> Result<i64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| ApiError::BadRequest(format!("invalid {} ID", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_unsigned_integers() {
        assert_eq!(parse_id("42", "user").unwrap(), 42);
        assert_eq!(parse_id("0", "user").unwrap(), 0);
    }

    #[test]
    fn test_parse_id_rejects_everything_else() {
        for raw in ["-1", "abc", "1.5", "", "18446744073709551615"] {
            let err = parse_id(raw, "user").unwrap_err();
            assert_eq!(err.to_string(), "Bad request: invalid user ID");
        }
    }
}
