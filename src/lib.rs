//! modelgate
//!
//! A unified model gateway: canonical generation requests are routed by
//! model-name prefix to a backend adapter, which translates the request
//! into the backend's wire shape and normalizes the backend's response —
//! complete or streamed — into one canonical request/response/event shape.
//!
//! The crate is a library boundary only: no network listener, no CLI. It is
//! safe to call concurrently from many independent contexts; the only
//! shared mutable state is the registry's fallback-provider cache.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use modelgate::Model;
//! use modelgate::providers::ollama::{OllamaConfig, OllamaProvider};
//! use modelgate::registry::ProviderRegistry;
//! use modelgate::types::ModelRequest;
//!
//! # async fn example() -> Result<(), modelgate::GatewayError> {
//! let registry = ProviderRegistry::builder(Arc::new(OllamaProvider::new(
//!     OllamaConfig::new().with_base_url("http://localhost:11434"),
//! )))
//! .build();
//!
//! let model = registry.resolve(Some("ollama/gpt-oss:20b")).await?;
//! let response = model.get_response(&ModelRequest::from_text("What's 2+2?")).await?;
//! println!("{:?}", response.text());
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod ids;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod streaming;
pub mod telemetry;
pub mod types;

pub use error::GatewayError;
pub use provider::{Model, Provider, SharedProvider};
pub use registry::{FallbackProviderFactory, ProviderRegistry, ProviderRegistryBuilder};
