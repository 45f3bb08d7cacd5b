/// Request logging middleware
///
/// Logs one line per request once the response is ready. The level follows the
/// status class: `error` for 5xx, `warn` for 4xx, `info` otherwise.
///
/// # Fields
///
/// - `method`, `path`, `status`
/// - `latency_ms`: time spent in the inner service
/// - `user_agent`: when the client sent one
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use storefront_api::middleware::logging::RequestLogLayer;
///
/// let app: Router = Router::new().layer(RequestLogLayer);
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

/// Request logging layer
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogLayer;

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogMiddleware { inner }
    }
}

/// Request logging service
#[derive(Debug, Clone)]
pub struct RequestLogMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestLogMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let start = Instant::now();
        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await?;
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
            let status = response.status();

            let status_code = status.as_u16();
            let user_agent = user_agent.as_deref();
            let level = level_for(status);

            if level == tracing::Level::ERROR {
                tracing::error!(%method, %path, status = status_code, latency_ms, user_agent, "HTTP request");
            } else if level == tracing::Level::WARN {
                tracing::warn!(%method, %path, status = status_code, latency_ms, user_agent, "HTTP request");
            } else {
                tracing::info!(%method, %path, status = status_code, latency_ms, user_agent, "HTTP request");
            }

            Ok(response)
        })
    }
}

fn level_for(status: StatusCode) -> tracing::Level {
    if status.is_server_error() {
        tracing::Level::ERROR
    } else if status.is_client_error() {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[test]
    fn test_level_follows_status_class() {
        assert_eq!(level_for(StatusCode::OK), tracing::Level::INFO);
        assert_eq!(level_for(StatusCode::NO_CONTENT), tracing::Level::INFO);
        assert_eq!(level_for(StatusCode::NOT_FOUND), tracing::Level::WARN);
        assert_eq!(level_for(StatusCode::CONFLICT), tracing::Level::WARN);
        assert_eq!(level_for(StatusCode::INTERNAL_SERVER_ERROR), tracing::Level::ERROR);
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let inner = service_fn(|_req: Request| async {
            let mut response = Response::new(Body::from("teapot"));
            *response.status_mut() = StatusCode::IM_A_TEAPOT;
            Ok::<_, Infallible>(response)
        });

        let response = RequestLogLayer
            .layer(inner)
            .oneshot(Request::builder().uri("/brew").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
