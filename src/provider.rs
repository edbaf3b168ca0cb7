//! Provider and model adapter traits.
//!
//! A [`Provider`] is a stateless factory that produces [`Model`] adapters
//! for backend-specific model identifiers. A model adapter owns request
//! translation, the backend call, and response/stream normalization for one
//! backend family. Adapters may hold a backend client handle but no
//! per-call mutable state, so they can be shared freely across concurrent
//! callers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{EventStream, ModelRequest, ModelResponse};

/// A model adapter for one backend family.
#[async_trait]
pub trait Model: Send + Sync {
    /// Run one non-streaming generation call.
    async fn get_response(&self, request: &ModelRequest) -> Result<ModelResponse, GatewayError>;

    /// Run one streaming generation call.
    ///
    /// The returned stream is finite, single-consumer, and not restartable.
    /// Dropping it before completion releases any resources the call holds
    /// (including its tracing span).
    async fn get_streamed_response(
        &self,
        request: &ModelRequest,
    ) -> Result<EventStream, GatewayError>;

    /// The model identifier this adapter was resolved for.
    fn model_name(&self) -> &str;
}

/// A factory producing model adapters.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create a model adapter for `name`.
    ///
    /// `name` is `None` when the caller did not specify a model; providers
    /// without a default model reject that with a configuration error.
    async fn get_model(&self, name: Option<&str>) -> Result<Arc<dyn Model>, GatewayError>;

    /// Stable identifier of this provider, used as its routing prefix.
    fn provider_id(&self) -> &str;
}

/// Shared provider handle.
pub type SharedProvider = Arc<dyn Provider>;
