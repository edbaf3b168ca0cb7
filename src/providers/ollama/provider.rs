//! Ollama provider and model adapter.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::{HttpOllamaBackend, OllamaBackend, OllamaConfig};
use super::request::build_chat_request;
use super::response::convert_chat_response;
use super::streaming::normalize_chunk_stream;
use crate::error::GatewayError;
use crate::provider::{Model, Provider};
use crate::registry::FallbackProviderFactory;
use crate::telemetry::{NoopTracer, SharedTracer, SpanError, SpanGuard, SpanKind};
use crate::types::{EventStream, ModelRequest, ModelResponse};

/// Provider id and routing prefix of this adapter.
pub const PROVIDER_ID: &str = "ollama";

/// Factory producing [`OllamaModel`] adapters.
pub struct OllamaProvider {
    config: OllamaConfig,
    backend: Arc<dyn OllamaBackend>,
    tracer: SharedTracer,
}

impl OllamaProvider {
    /// Create a provider with the shipped HTTP transport.
    pub fn new(config: OllamaConfig) -> Self {
        let backend = Arc::new(HttpOllamaBackend::new(&config));
        Self {
            config,
            backend,
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Replace the transport (tests, custom HTTP stacks).
    pub fn with_backend(mut self, backend: Arc<dyn OllamaBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Install a tracing collaborator.
    pub fn with_tracer(mut self, tracer: SharedTracer) -> Self {
        self.tracer = tracer;
        self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(OllamaConfig::default())
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn get_model(&self, name: Option<&str>) -> Result<Arc<dyn Model>, GatewayError> {
        let name = name.filter(|n| !n.is_empty()).ok_or_else(|| {
            GatewayError::ConfigurationError(
                "A model name is required for the ollama provider".to_string(),
            )
        })?;

        Ok(Arc::new(OllamaModel {
            model: name.to_string(),
            backend: self.backend.clone(),
            keep_alive: self.config.keep_alive.clone(),
            format: self.config.format.clone(),
            tracer: self.tracer.clone(),
        }))
    }

    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }
}

/// Model adapter for one Ollama model.
pub struct OllamaModel {
    model: String,
    backend: Arc<dyn OllamaBackend>,
    keep_alive: Option<String>,
    format: Option<serde_json::Value>,
    tracer: SharedTracer,
}

impl OllamaModel {
    fn span_for(&self, request: &ModelRequest) -> SpanGuard {
        let span = SpanGuard::new(self.tracer.start_span(SpanKind::Generation));
        if request.tracing_enabled {
            span.span().set_input(
                serde_json::to_value(request).unwrap_or(serde_json::Value::Null),
            );
        }
        span
    }
}

#[async_trait]
impl Model for OllamaModel {
    async fn get_response(&self, request: &ModelRequest) -> Result<ModelResponse, GatewayError> {
        let span = self.span_for(request);

        let body = match build_chat_request(
            &self.model,
            request,
            self.keep_alive.as_deref(),
            self.format.as_ref(),
            false,
        ) {
            Ok(body) => body,
            Err(err) => {
                span.span()
                    .set_error(SpanError::from_error(&err, request.tracing_enabled));
                span.finish();
                return Err(err);
            }
        };

        match self.backend.chat(&body).await {
            Ok(raw) => {
                let response = convert_chat_response(&raw);
                if request.tracing_enabled {
                    span.span().set_output(
                        serde_json::to_value(&response).unwrap_or(serde_json::Value::Null),
                    );
                }
                span.finish();
                Ok(response)
            }
            Err(err) => {
                span.span()
                    .set_error(SpanError::from_error(&err, request.tracing_enabled));
                span.finish();
                Err(err)
            }
        }
    }

    async fn get_streamed_response(
        &self,
        request: &ModelRequest,
    ) -> Result<EventStream, GatewayError> {
        let span = self.span_for(request);

        let body = match build_chat_request(
            &self.model,
            request,
            self.keep_alive.as_deref(),
            self.format.as_ref(),
            true,
        ) {
            Ok(body) => body,
            Err(err) => {
                span.span()
                    .set_error(SpanError::from_error(&err, request.tracing_enabled));
                span.finish();
                return Err(err);
            }
        };

        let chunks = match self.backend.chat_stream(&body).await {
            Ok(chunks) => chunks,
            Err(err) => {
                span.span()
                    .set_error(SpanError::from_error(&err, request.tracing_enabled));
                span.finish();
                return Err(err);
            }
        };

        Ok(normalize_chunk_stream(chunks, span, request.tracing_enabled))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Fallback factory constructing an [`OllamaProvider`] for its prefix.
///
/// Returns `None` for every other prefix, which the registry surfaces as a
/// configuration error.
pub struct OllamaFallbackFactory {
    config: OllamaConfig,
}

impl OllamaFallbackFactory {
    /// Create a factory using the given provider configuration.
    pub fn new(config: OllamaConfig) -> Self {
        Self { config }
    }
}

impl FallbackProviderFactory for OllamaFallbackFactory {
    fn create(
        &self,
        prefix: &str,
    ) -> Result<Option<Arc<dyn Provider>>, GatewayError> {
        if prefix == PROVIDER_ID {
            Ok(Some(Arc::new(OllamaProvider::new(self.config.clone()))))
        } else {
            Ok(None)
        }
    }
}
