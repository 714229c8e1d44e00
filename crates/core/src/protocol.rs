//! Request and response bodies shared by the HTTP server and client.

use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;
use crate::types::ItemId;

/// Body returned by a successful `POST /api/sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub success: bool,
    pub count: usize,
}

/// Body of `POST /api/export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub ids: Vec<ItemId>,
    pub format: ExportFormat,
}
