//! Client for the Gemini `generateContent` REST endpoint, used by the
//! "enhance prompt" and "explain item" actions.
//!
//! Each action is a single request/response with no retry. Request wording
//! and empty-reply fallbacks come from [`devsnippet_core::assist`].

use std::time::Duration;

use devsnippet_core::assist;
use devsnippet_core::item::Item;
use serde::{Deserialize, Serialize};

/// Public Gemini API root.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the language-model client.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// No API key was configured.
    #[error("API key is missing")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Settings for [`AssistClient`].
#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AssistConfig {
    /// Load from the environment.
    ///
    /// | Env Var          | Default                    |
    /// |------------------|----------------------------|
    /// | `GEMINI_API_KEY` | falls back to `API_KEY`    |
    /// | `GEMINI_MODEL`   | `gemini-3-flash-preview`   |
    /// | `GEMINI_API_URL` | public v1beta endpoint     |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let api_url = std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        Self {
            api_key,
            model,
            api_url,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the language-model collaborator.
#[derive(Debug, Clone)]
pub struct AssistClient {
    client: reqwest::Client,
    config: AssistConfig,
}

impl AssistClient {
    pub fn new(config: AssistConfig) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Rewrite a prompt to be more precise. Returns the original prompt when
    /// the model replies with no text.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String, AssistError> {
        let reply = self
            .generate(&assist::enhance_prompt_request(prompt))
            .await?;
        Ok(assist::enhanced_or_original(reply.as_deref(), prompt))
    }

    /// Explain what an item does, worded for its category.
    pub async fn explain(&self, item: &Item) -> Result<String, AssistError> {
        let reply = self.generate(&assist::explain_request(item)).await?;
        Ok(assist::explanation_or_fallback(reply.as_deref()))
    }

    /// Send one `generateContent` request and return the first candidate's
    /// text, if any.
    pub async fn generate(&self, text: &str) -> Result<Option<String>, AssistError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [RequestPart { text }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.api_url.trim_end_matches('/'),
                self.config.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Gemini request failed");
            return Err(AssistError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.first_text())
    }
}
