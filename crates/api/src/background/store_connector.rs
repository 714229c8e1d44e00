//! Establishes the item store connection after the server is already
//! listening.
//!
//! Attempts to connect, health-check and migrate on a fixed interval until
//! one attempt succeeds, then installs the pool into the shared
//! [`StoreHandle`]. Requests that arrive before that answer 503.

use std::time::Duration;

use devsnippet_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::state::StoreHandle;

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect, verify and migrate in one attempt.
pub async fn connect_once(database_url: &str) -> Result<DbPool, ConnectError> {
    let pool = devsnippet_db::create_pool(database_url).await?;
    devsnippet_db::health_check(&pool).await?;
    devsnippet_db::run_migrations(&pool).await?;
    Ok(pool)
}

/// Run the connect loop until the store is ready or `cancel` is triggered.
pub async fn run(
    database_url: String,
    store: StoreHandle,
    retry_interval: Duration,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Store connector stopping before database became ready");
                return;
            }
            result = connect_once(&database_url) => result,
        };

        match result {
            Ok(pool) => {
                store.set(pool);
                tracing::info!(attempt, "Database connected and migrations applied");
                return;
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    error = %e,
                    retry_in_secs = retry_interval.as_secs(),
                    "Database not ready, retrying"
                );
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Store connector stopping before database became ready");
                return;
            }
            _ = tokio::time::sleep(retry_interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_connector_leaves_store_pending() {
        let store = StoreHandle::pending();
        let cancel = CancellationToken::new();
        cancel.cancel();

        run(
            "postgres://devsnippet@127.0.0.1:1/devsnippet".into(),
            store.clone(),
            Duration::from_millis(10),
            cancel,
        )
        .await;

        assert!(!store.is_ready());
    }
}
