//! HTTP client side of DevSnippet.
//!
//! - [`api::ApiClient`] talks to the read, sync and export endpoints.
//! - [`sync::SyncWorker`] pushes client state snapshots one at a time.
//! - [`assist::AssistClient`] calls the language-model collaborator.

pub mod api;
pub mod assist;
pub mod config;
pub mod error;
pub mod sync;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use sync::{SyncStatus, SyncTarget, SyncWorker};
