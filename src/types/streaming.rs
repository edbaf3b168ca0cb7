//! Canonical stream events.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::response::ModelResponse;
use crate::error::GatewayError;

/// One canonical stream event.
///
/// Every successful stream starts with [`StreamEvent::ResponseStarted`] and
/// ends with exactly one [`StreamEvent::ResponseDone`]. On the tool-call
/// path the terminal event carries exactly one function-call output and no
/// text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The stream has started.
    ResponseStarted,
    /// Verbatim backend chunk, passed through for diagnostics.
    RawProviderEvent {
        /// The already-parsed backend chunk.
        payload: serde_json::Value,
    },
    /// Incremental model text. Carries this chunk's delta only, never the
    /// accumulated buffer.
    OutputTextDelta {
        /// The text delta.
        delta: String,
    },
    /// Terminal event carrying the assembled response.
    ResponseDone {
        /// The assembled canonical response.
        response: ModelResponse,
    },
}

/// Canonical event stream produced by a streamed generation call.
///
/// Finite, single-consumer, not restartable. Callers must not share one
/// in-flight stream across concurrent consumers.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, GatewayError>> + Send>>;
