use std::sync::{Arc, OnceLock};

use devsnippet_db::DbPool;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Lazily-initialized handle to the item store.
///
/// The server accepts requests before the database is reachable. The
/// background connector fills the handle once a pool is established; until
/// then [`StoreHandle::pool`] returns [`AppError::ServiceUnavailable`].
#[derive(Clone, Default)]
pub struct StoreHandle {
    pool: Arc<OnceLock<DbPool>>,
}

impl StoreHandle {
    /// A handle that is already connected.
    pub fn ready(pool: DbPool) -> Self {
        let handle = Self::pending();
        handle.set(pool);
        handle
    }

    /// A handle waiting for the background connector.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Install the pool. Returns `false` if one was already installed.
    pub fn set(&self, pool: DbPool) -> bool {
        self.pool.set(pool).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.pool.get().is_some()
    }

    /// The connected pool, or 503 while the store is still initializing.
    pub fn pool(&self) -> Result<&DbPool, AppError> {
        self.pool.get().ok_or_else(|| {
            AppError::ServiceUnavailable("Database not ready".to_string())
        })
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Item store connection, filled in by the background connector.
    pub store: StoreHandle,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
