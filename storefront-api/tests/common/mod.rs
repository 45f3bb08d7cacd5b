//! Common test utilities for router tests
//!
//! The router is built over in-memory repositories, so these tests need no
//! database. Requests are driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use storefront_api::app::{build_router, AppState};
use storefront_shared::config::Config;
use storefront_shared::repository::Repositories;
use tower::ServiceExt;

/// Router plus request helpers
pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    /// Fresh router over empty in-memory repositories
    pub fn new() -> Self {
        let state = AppState::new(Repositories::in_memory(), Config::default());
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status and the parsed JSON body
    ///
    /// An empty body parses as `Value::Null`.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|e| panic!("Response is not JSON ({}): {:?}", e, bytes))
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

/// Asserts the error envelope shape and returns the first error message
pub fn assert_error(body: &Value, error_type: &str, status_code: u16) -> String {
    assert_eq!(body["success"], false, "body: {}", body);
    assert!(body.get("data").is_none(), "body: {}", body);
    assert_eq!(body["error"]["type"], error_type, "body: {}", body);
    assert_eq!(body["error"]["status_code"], status_code, "body: {}", body);

    body["error"]["errors"][0]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
