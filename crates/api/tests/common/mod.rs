#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use devsnippet_api::config::ServerConfig;
use devsnippet_api::router::build_app_router;
use devsnippet_api::state::{AppState, StoreHandle};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a small sync body limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sync_body_limit_bytes: 64 * 1024,
        db_retry_interval_secs: 1,
        database_url: String::new(),
    }
}

/// Build the full application router, with the store already connected to
/// the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_store(StoreHandle::ready(pool))
}

/// Build the application router with a store that never becomes ready.
pub fn build_pending_app() -> Router {
    build_app_with_store(StoreHandle::pending())
}

fn build_app_with_store(store: StoreHandle) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A JSON item in wire format.
pub fn item_json(id: &str, category: &str, title: &str, updated_at: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "content": format!("content of {id}"),
        "category": category,
        "tags": [],
        "createdAt": 1_700_000_000_000_i64,
        "updatedAt": updated_at,
    })
}
