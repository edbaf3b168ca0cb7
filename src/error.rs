//! Error handling for the gateway.
//!
//! A single error enum covers the whole crate. Variants are grouped by where
//! they surface: configuration problems are fatal and reported immediately,
//! translation problems are per-item (malformed tools and items are skipped,
//! never failing the whole request), and backend failures are propagated to
//! the caller unchanged — the gateway performs no retries of its own.

use thiserror::Error;

/// Errors produced by the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Invalid or missing configuration (unknown provider prefix, missing
    /// model name, bad base URL).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A whole request could not be translated into the backend's shape.
    /// Individual malformed tools or items never raise this; they are
    /// skipped and logged instead.
    #[error("Translation error: {0}")]
    TranslationError(String),

    /// Transport-level failure talking to the backend.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The backend answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        /// HTTP status code returned by the backend.
        code: u16,
        /// Response body text, preserved verbatim.
        message: String,
    },

    /// The backend's response or chunk could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The backend's chunk stream failed mid-flight.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// The backend violated an assumption this adapter depends on, e.g. a
    /// chunk observed after the stream already emitted its terminal event.
    /// Surfaced loudly rather than silently dropping data.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// The requested operation is not supported by this adapter.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An internal invariant was broken.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GatewayError {
    /// Stable classification label for this error.
    ///
    /// Used for span annotation when the caller did not explicitly request
    /// tracing, so potentially sensitive payloads are not recorded by
    /// default.
    pub fn classification(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "configuration_error",
            Self::TranslationError(_) => "translation_error",
            Self::HttpError(_) => "http_error",
            Self::ApiError { .. } => "api_error",
            Self::ParseError(_) => "parse_error",
            Self::StreamError(_) => "stream_error",
            Self::ProtocolViolation(_) => "protocol_violation",
            Self::UnsupportedOperation(_) => "unsupported_operation",
            Self::InternalError(_) => "internal_error",
        }
    }

    /// Whether this error originated from the backend call rather than from
    /// the gateway itself.
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::ApiError { .. } | Self::ParseError(_) | Self::StreamError(_)
        )
    }
}
