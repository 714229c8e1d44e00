/// Errors from the store API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether repeating the same request could succeed.
    ///
    /// Network failures (including timeouts), request timeouts, throttling
    /// and 5xx responses other than a rolled-back sync are retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Status { status, .. } => matches!(status, 408 | 429 | 502 | 503 | 504),
            ClientError::Decode(_) => false,
        }
    }
}
