//! # Storefront API Server
//!
//! Serves the user, product and order endpoints under `/api/v1`.
//!
//! ## Startup
//!
//! 1. Load configuration (`config.yaml`, then `APP_*` environment variables)
//! 2. Create the database if missing and open the pool
//! 3. Apply migrations
//! 4. Serve until SIGINT/SIGTERM, then drain in-flight requests
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p storefront-api
//! ```

use anyhow::Context;
use std::time::Duration;
use storefront_api::app::{build_router, AppState};
use storefront_shared::{config::Config, db, repository::Repositories};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storefront_api=debug,storefront_shared=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Storefront API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load().context("Failed to load configuration")?;

    let pool = db::open(&config.database)
        .await
        .context("Failed to connect to database")?;

    db::migrations::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(Repositories::postgres(pool.clone()), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    };

    // Once the signal arrives, in-flight requests get `shutdown_timeout` to finish
    tokio::select! {
        result = server => result.context("Server error")?,
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, forcing exit"
            );
        }
    }

    db::pool::close_pool(pool).await;
    tracing::info!("Server exited");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
