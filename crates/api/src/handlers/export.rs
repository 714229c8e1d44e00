//! Handler for downloading an export of selected items.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use devsnippet_core::error::CoreError;
use devsnippet_core::export::{self, ExportError};
use devsnippet_core::protocol::ExportRequest;
use devsnippet_db::repositories::ItemRepo;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /export
// ---------------------------------------------------------------------------

/// Render the selected items in the requested format and return them as a
/// file download.
///
/// Registry-only selections may use `reg`, `ps1` or `bat`; any other
/// selection only offers `bundle`.
pub async fn export_items(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> AppResult<impl IntoResponse> {
    if req.ids.is_empty() {
        return Err(ExportError::EmptySelection.into());
    }

    let pool = state.store.pool()?;
    let items = ItemRepo::find_by_ids(pool, &req.ids).await?;

    if let Some(missing) = req
        .ids
        .iter()
        .find(|id| !items.iter().any(|item| &item.id == *id))
    {
        return Err(CoreError::NotFound {
            entity: "Item",
            id: missing.clone(),
        }
        .into());
    }

    let artifact = export::export(&items, req.format)?;

    tracing::info!(
        format = %req.format,
        items = items.len(),
        filename = %artifact.filename,
        bytes = artifact.bytes.len(),
        "Export generated"
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, artifact.content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    ))
}
