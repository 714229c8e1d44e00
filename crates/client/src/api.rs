//! REST client for the DevSnippet store endpoints.
//!
//! Wraps `GET /api/items`, `POST /api/sync` and `POST /api/export` using
//! [`reqwest`]. Every request carries the configured timeout.

use devsnippet_core::export::ExportFormat;
use devsnippet_core::item::Item;
use devsnippet_core::protocol::{ExportRequest, SyncSummary};
use devsnippet_core::types::ItemId;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client for a single DevSnippet server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
}

/// A file returned by the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// File name from `Content-Disposition`, if the server sent one.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    /// Create a client for the server described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`]. The caller is
    /// responsible for its timeout.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            api_url: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    /// Fetch the full item collection.
    pub async fn load_items(&self) -> Result<Vec<Item>, ClientError> {
        let response = self
            .client
            .get(format!("{}/items", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the full item collection, degrading to an empty list when the
    /// store cannot be reached.
    pub async fn load_items_or_empty(&self) -> Vec<Item> {
        match self.load_items().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Loaded items");
                items
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load items, starting with an empty list");
                Vec::new()
            }
        }
    }

    /// Replace the stored collection with `items`.
    pub async fn sync_items(&self, items: &[Item]) -> Result<SyncSummary, ClientError> {
        let response = self
            .client
            .post(format!("{}/sync", self.api_url))
            .json(items)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download an export of the items with the given ids.
    pub async fn export(
        &self,
        ids: Vec<ItemId>,
        format: ExportFormat,
    ) -> Result<Download, ClientError> {
        let response = self
            .client
            .post(format!("{}/export", self.api_url))
            .json(&ExportRequest { ids, format })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let headers = response.headers();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Download {
            filename,
            content_type,
            bytes: response.bytes().await?.to_vec(),
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// File name from an `attachment; filename="..."` header value.
fn attachment_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_read_from_disposition() {
        assert_eq!(
            attachment_filename("attachment; filename=\"registry_export.reg\""),
            Some("registry_export.reg".to_string())
        );
        assert_eq!(attachment_filename("attachment"), None);
    }

    #[test]
    fn api_url_is_prefixed() {
        let client = ApiClient::with_client(reqwest::Client::new(), "http://host:3000/");
        assert_eq!(client.api_url, "http://host:3000/api");
    }
}
