/// Background worker process
///
/// The worker owns a database pool and a shutdown token. It currently runs no
/// jobs: `run` reports readiness and parks until the token is cancelled. Jobs
/// added later should select on the same token so they stop with the process.
///
/// # Example
///
/// ```no_run
/// use storefront_worker::worker::{shutdown_signal, Worker};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> anyhow::Result<()> {
/// let worker = Worker::new(pool);
///
/// let token = worker.shutdown_token();
/// tokio::spawn(async move {
///     shutdown_signal().await;
///     token.cancel();
/// });
///
/// worker.run().await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Background worker
pub struct Worker {
    /// Database connection pool
    db: PgPool,

    /// Cancelled to request shutdown
    shutdown_token: CancellationToken,
}

impl Worker {
    /// Creates a worker over the given pool
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Gets shutdown token
    ///
    /// Used to signal graceful shutdown from external handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Database pool shared with future jobs
    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    /// Runs until the shutdown token is cancelled
    ///
    /// # Errors
    ///
    /// Never fails today; the signature leaves room for jobs that can.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            pool_size = self.db.size(),
            "Worker ready, no jobs scheduled"
        );

        self.shutdown_token.cancelled().await;

        tracing::info!("Worker stopping");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
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
