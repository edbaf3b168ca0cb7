//! Ollama backend adapter.
//!
//! Translates canonical requests into `/api/chat` calls and normalizes the
//! backend's responses and newline-delimited JSON streams into the
//! canonical shapes.
//!
//! Known limitation: at most one tool call per streamed turn. The first
//! completed tool call terminates the stream; additional calls in the same
//! chunk are logged and dropped.

pub mod client;
pub mod params;
pub mod request;
pub mod response;
pub mod streaming;
pub mod types;

mod provider;

pub use client::{DEFAULT_BASE_URL, HttpOllamaBackend, OllamaBackend, OllamaConfig};
pub use provider::{OllamaFallbackFactory, OllamaModel, OllamaProvider, PROVIDER_ID};
