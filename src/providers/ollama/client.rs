//! Ollama backend client: configuration and HTTP transport.
//!
//! The transport is behind the [`OllamaBackend`] trait so tests (and callers
//! with their own authenticated HTTP stack) can inject a replacement. The
//! shipped implementation talks to `/api/chat` with an explicitly injected
//! `reqwest::Client` — authentication is configuration, never a globally
//! patched transport.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::types::{OllamaChatRequest, OllamaChatResponse};
use crate::error::GatewayError;
use crate::streaming::{ChunkStream, json_lines_stream};

/// Default base URL of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Configuration for the Ollama provider.
#[derive(Debug, Clone, Default)]
pub struct OllamaConfig {
    /// Server base URL; defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Bearer token for authenticated deployments.
    pub api_key: Option<SecretString>,
    /// Default `keep_alive` forwarded on every request.
    pub keep_alive: Option<String>,
    /// Default output format constraint forwarded on every request.
    pub format: Option<serde_json::Value>,
    /// Pre-built HTTP client to use instead of constructing one.
    pub http_client: Option<reqwest::Client>,
}

impl OllamaConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the default `keep_alive`.
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    /// Set the default output format constraint.
    pub fn with_format(mut self, format: serde_json::Value) -> Self {
        self.format = Some(format);
        self
    }

    /// Inject a pre-built HTTP client.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }
}

/// Transport boundary of the Ollama adapter.
///
/// Implementations return already-parsed responses and chunk values; the
/// normalizers never see bytes.
#[async_trait]
pub trait OllamaBackend: Send + Sync {
    /// Run one non-streaming chat call.
    async fn chat(&self, request: &OllamaChatRequest) -> Result<OllamaChatResponse, GatewayError>;

    /// Run one streaming chat call, yielding parsed chunk values.
    async fn chat_stream(&self, request: &OllamaChatRequest) -> Result<ChunkStream, GatewayError>;
}

/// HTTP transport for the Ollama chat API.
pub struct HttpOllamaBackend {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpOllamaBackend {
    /// Build the transport from provider configuration.
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            http_client: config.http_client.clone().unwrap_or_default(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.clone(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: &OllamaChatRequest) -> Result<reqwest::Response, GatewayError> {
        let mut builder = self.http_client.post(self.chat_url()).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::HttpError(format!("Failed to send request: {e}")))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiError { code, message });
        }
        Ok(response)
    }
}

#[async_trait]
impl OllamaBackend for HttpOllamaBackend {
    async fn chat(&self, request: &OllamaChatRequest) -> Result<OllamaChatResponse, GatewayError> {
        let response = self.send(request).await?;
        response
            .json::<OllamaChatResponse>()
            .await
            .map_err(|e| GatewayError::ParseError(format!("Failed to parse chat response: {e}")))
    }

    async fn chat_stream(&self, request: &OllamaChatRequest) -> Result<ChunkStream, GatewayError> {
        let response = self.send(request).await?;
        Ok(json_lines_stream(response))
    }
}
