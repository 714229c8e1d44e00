//! Handlers for reading and bulk-syncing the item collection.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use devsnippet_core::item::Item;
use devsnippet_core::protocol::SyncSummary;
use devsnippet_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /items
// ---------------------------------------------------------------------------

/// Return every stored item, most recently updated first.
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let pool = state.store.pool()?;
    let items = ItemRepo::list_all(pool).await?;
    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// POST /sync
// ---------------------------------------------------------------------------

/// Replace the stored collection with the request body.
///
/// The body must be a JSON array of items. Every element is decoded and
/// validated before the store is touched; the replace itself runs in one
/// transaction, so a failure leaves the previous collection intact.
pub async fn sync_items(State(state): State<AppState>, body: Bytes) -> AppResult<Json<SyncSummary>> {
    let pool = state.store.pool()?;

    let items = decode_sync_body(&body)?;
    for item in &items {
        item.validate()?;
    }

    let inserted = ItemRepo::replace_all(pool, &items)
        .await
        .map_err(AppError::sync_failure)?;

    tracing::info!(count = inserted, "Item collection synced");

    Ok(Json(SyncSummary {
        success: true,
        count: items.len(),
    }))
}

/// Parse a sync body into items. Anything other than a JSON array of
/// well-formed items is a bad request.
pub fn decode_sync_body(body: &[u8]) -> Result<Vec<Item>, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    if !value.is_array() {
        return Err(AppError::BadRequest(
            "Sync body must be an array of items".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid item: {e}")))
}
