pub mod health;
pub mod items;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                                           list all items (GET)
/// /sync                                            replace all items (POST)
/// /export                                          download selection (POST)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new().merge(items::router(config.sync_body_limit_bytes))
}
