//! # Storefront Worker
//!
//! Background process for the Storefront backend. It connects to the same
//! database as the API server and stays up until SIGINT/SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p storefront-worker
//! ```

use anyhow::Context;
use storefront_shared::{config::Config, db};
use storefront_worker::worker::{shutdown_signal, Worker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_worker=debug,storefront_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Storefront Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load().context("Failed to load configuration")?;

    let pool = db::open(&config.database)
        .await
        .context("Failed to connect to database")?;

    let worker = Worker::new(pool.clone());

    let token = worker.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    worker.run().await?;

    db::pool::close_pool(pool).await;
    tracing::info!("Worker exited");

    Ok(())
}
