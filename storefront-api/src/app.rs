/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use storefront_api::app::{build_router, AppState};
/// use storefront_shared::{config::Config, db, repository::Repositories};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let pool = db::open(&config.database).await?;
/// let state = AppState::new(Repositories::postgres(pool), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::error::{handle_middleware_error, handle_panic, ApiError};
use crate::{middleware::logging::RequestLogLayer, routes};
use axum::{error_handling::HandleErrorLayer, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use storefront_shared::{config::Config, repository::Repositories, service::Services};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Services hold their repositories behind `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Business services
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state over the given repositories
    pub fn new(repos: Repositories, config: Config) -> Self {
        Self {
            services: Services::new(repos),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                 # Liveness (public)
/// └── /api/v1/
///     ├── /users              # POST, GET (paginated)
///     │   └── /:id            # GET, PUT, DELETE
///     ├── /products           # POST, GET
///     │   └── /:id            # GET, PUT, DELETE
///     └── /orders             # POST, GET (first 10)
///         └── /:id            # GET
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Panic recovery (tower-http CatchPanicLayer, `SERVER_ERROR` envelope)
/// 2. Request timeout (tower `timeout`, `REQUEST_TIMEOUT` envelope)
/// 3. Access log (`RequestLogLayer`)
/// 4. Tracing spans (tower-http TraceLayer)
///
/// Unknown paths get a `NOT_FOUND` envelope. A client that disconnects drops
/// the handler future, which cancels any in-flight database call.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/:id",
            get(routes::products::get_product)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        );

    let order_routes = Router::new()
        .route(
            "/",
            get(routes::orders::list_orders).post(routes::orders::create_order),
        )
        .route("/:id", get(routes::orders::get_order));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/products", product_routes)
        .nest("/orders", order_routes);

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", v1_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(RequestLogLayer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn test_state(request_timeout_seconds: u64) -> AppState {
        let mut config = Config::default();
        config.server.request_timeout_seconds = request_timeout_seconds;
        AppState::new(Repositories::in_memory(), config)
    }

    #[tokio::test]
    async fn test_router_builds_and_serves_health() {
        let response = build_router(test_state(15))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_panicking_handler_yields_server_error_envelope() {
        let app = Router::new()
            .route("/boom", get(|| async { panic!("boom") as () }))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "SERVER_ERROR");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handler_yields_timeout_envelope() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    "late"
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .timeout(Duration::from_secs(1)),
            );

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["type"], "REQUEST_TIMEOUT");
        assert_eq!(body["error"]["status_code"], 408);
    }
}
