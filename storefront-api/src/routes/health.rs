/// Health check endpoint
///
/// Liveness only: answers as long as the process is serving requests, without
/// touching the database.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "time": "2024-03-01T12:00:00+00:00"
/// }
/// ```

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `OK`
    pub status: String,

    /// Current server time, RFC 3339
    pub time: String,
}

/// Health check handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
    })
}
