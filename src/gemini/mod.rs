//! Gemini integration
//!
//! Provides:
//! - Wire types for the `generateContent` endpoint
//! - The `ImageProvider` seam the relay calls through
//! - `GeminiClient`, the reqwest-backed provider

mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::GeminiConfig;

pub use types::{
    Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

/// Provider call failures
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Gemini API key not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),
}

/// A generative model that accepts multi-part content
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Whether credentials are present
    fn is_configured(&self) -> bool;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Run one `generateContent` call
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;
}

/// Gemini API client
#[derive(Debug)]
pub struct GeminiClient {
    /// HTTP client
    client: Client,
    /// API key
    api_key: Option<String>,
    /// API base URL
    base_url: String,
    /// Model identifier
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or(ProviderError::NotConfigured)?;

        debug!("Sending generateContent request to Gemini: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
