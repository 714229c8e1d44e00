use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{export, items};
use crate::state::AppState;

/// Item collection routes.
///
/// The sync route carries its own body limit since it receives the whole
/// collection in one request.
pub fn router(sync_body_limit_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list_items))
        .route(
            "/sync",
            post(items::sync_items).layer(DefaultBodyLimit::max(sync_body_limit_bytes)),
        )
        .route("/export", post(export::export_items))
}
