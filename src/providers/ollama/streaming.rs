//! Streaming normalization for the Ollama backend.
//!
//! Turns the backend's chunk sequence into the canonical event sequence,
//! owning the accumulation state machine:
//!
//! ```text
//! INIT -> STREAMING -> DONE
//!               \----> (error surfaced to the consumer)
//! ```
//!
//! The first chunk emits `ResponseStarted`. Every chunk is passed through as
//! a `RawProviderEvent` for diagnostics. Text deltas accumulate internally
//! while only the per-chunk delta is emitted. Usage counters overwrite the
//! latest snapshot (later values win; this backend reports them on the final
//! chunk). The first completed tool call short-circuits the stream with a
//! terminal `ResponseDone`; more than one tool call per streamed turn is not
//! supported by this adapter generation, additional calls in the same chunk
//! are logged and dropped.
//!
//! The generation span travels with the stream inside a guard, so it is
//! ended on normal completion, on mid-stream errors, and when the consumer
//! drops the stream early.

use futures_util::StreamExt;

use super::response::convert_tool_call;
use super::types::OllamaChunk;
use crate::error::GatewayError;
use crate::ids;
use crate::streaming::ChunkStream;
use crate::telemetry::{SpanError, SpanGuard};
use crate::types::{
    ContentPart, EventStream, MessageRole, ModelResponse, OutputItem, StreamEvent, Usage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Init,
    Streaming,
    Done,
}

/// Accumulation state for one streamed call.
struct StreamState {
    stage: Stage,
    text_buffer: String,
    usage: Usage,
}

impl StreamState {
    fn new() -> Self {
        Self {
            stage: Stage::Init,
            text_buffer: String::new(),
            usage: Usage::default(),
        }
    }

    fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Process one backend chunk into zero or more canonical events.
    fn ingest(&mut self, payload: serde_json::Value) -> Result<Vec<StreamEvent>, GatewayError> {
        if self.stage == Stage::Done {
            return Err(GatewayError::ProtocolViolation(
                "received a chunk after the terminal event was emitted".to_string(),
            ));
        }

        let mut events = Vec::new();
        if self.stage == Stage::Init {
            events.push(StreamEvent::ResponseStarted);
            self.stage = Stage::Streaming;
        }
        events.push(StreamEvent::RawProviderEvent {
            payload: payload.clone(),
        });

        let chunk: OllamaChunk = serde_json::from_value(payload)
            .map_err(|e| GatewayError::ParseError(format!("Failed to parse stream chunk: {e}")))?;

        if let Some(delta) = chunk
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .filter(|content| !content.is_empty())
        {
            self.text_buffer.push_str(delta);
            events.push(StreamEvent::OutputTextDelta {
                delta: delta.to_string(),
            });
        }

        if chunk.prompt_eval_count.is_some() || chunk.eval_count.is_some() {
            self.usage = Usage::new(
                chunk.prompt_eval_count.unwrap_or(0),
                chunk.eval_count.unwrap_or(0),
            );
        }

        if let Some(calls) = chunk
            .message
            .as_ref()
            .and_then(|m| m.tool_calls.as_deref())
            .filter(|calls| !calls.is_empty())
        {
            if calls.len() > 1 {
                tracing::warn!(
                    dropped = calls.len() - 1,
                    "multiple tool calls in one streamed turn are not supported; keeping the first"
                );
            }
            events.push(self.finish_with_tool_call(&calls[0]));
            return Ok(events);
        }

        if chunk.done == Some(true) {
            events.push(self.finish_with_message());
        }

        Ok(events)
    }

    fn finish_with_tool_call(
        &mut self,
        call: &super::types::OllamaToolCall,
    ) -> StreamEvent {
        self.stage = Stage::Done;
        StreamEvent::ResponseDone {
            response: ModelResponse {
                output: vec![OutputItem::FunctionCall(convert_tool_call(call))],
                usage: self.final_usage(),
                response_id: ids::completion_id(),
            },
        }
    }

    /// Terminal events for a stream that closed without a final chunk.
    /// An untouched stream still produces a well-formed start/done pair.
    fn finish_truncated(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(2);
        if self.stage == Stage::Init {
            events.push(StreamEvent::ResponseStarted);
        }
        events.push(self.finish_with_message());
        events
    }

    fn finish_with_message(&mut self) -> StreamEvent {
        self.stage = Stage::Done;
        let output = if self.text_buffer.is_empty() {
            Vec::new()
        } else {
            vec![OutputItem::Message {
                role: MessageRole::Assistant,
                content: vec![ContentPart::output_text(self.text_buffer.clone())],
            }]
        };
        StreamEvent::ResponseDone {
            response: ModelResponse {
                output,
                usage: self.final_usage(),
                response_id: ids::completion_id(),
            },
        }
    }

    fn final_usage(&self) -> Usage {
        let mut usage = self.usage.clone();
        usage.requests = 1;
        usage
    }
}

/// Drive a backend chunk stream through the state machine.
///
/// Owns `span` for the lifetime of the returned stream; the guard ends the
/// span on every exit path. After the terminal event the backend stream is
/// not consumed any further.
pub(crate) fn normalize_chunk_stream(
    mut chunks: ChunkStream,
    span: SpanGuard,
    tracing_enabled: bool,
) -> EventStream {
    let stream = async_stream::stream! {
        let span = span;
        let mut state = StreamState::new();

        while let Some(next) = chunks.next().await {
            match next {
                Ok(payload) => match state.ingest(payload) {
                    Ok(events) => {
                        for event in events {
                            if tracing_enabled
                                && let StreamEvent::ResponseDone { response } = &event
                            {
                                span.span().set_output(
                                    serde_json::to_value(response)
                                        .unwrap_or(serde_json::Value::Null),
                                );
                            }
                            yield Ok(event);
                        }
                        if state.is_done() {
                            break;
                        }
                    }
                    Err(err) => {
                        span.span().set_error(SpanError::from_error(&err, tracing_enabled));
                        span.finish();
                        yield Err(err);
                        return;
                    }
                },
                Err(err) => {
                    span.span().set_error(SpanError::from_error(&err, tracing_enabled));
                    span.finish();
                    yield Err(err);
                    return;
                }
            }
        }

        if !state.is_done() {
            // The backend closed the stream without a final chunk; surface
            // whatever accumulated so the sequence stays well formed.
            tracing::debug!("stream ended without a terminal chunk; synthesizing one");
            for event in state.finish_truncated() {
                if tracing_enabled
                    && let StreamEvent::ResponseDone { response } = &event
                {
                    span.span().set_output(
                        serde_json::to_value(response).unwrap_or(serde_json::Value::Null),
                    );
                }
                yield Ok(event);
            }
        }
        span.finish();
    };
    Box::pin(stream)
}
