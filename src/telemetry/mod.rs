//! Tracing collaborator contract.
//!
//! The gateway consumes tracing through a deliberately narrow surface:
//! start a span, annotate it with input/output/error, end it. Everything
//! else — exporters, sampling, propagation — belongs to the collaborator
//! behind the [`Tracer`] trait. All methods may be no-ops when tracing is
//! disabled; [`NoopTracer`] is the default wiring.
//!
//! Spans may be nested: a tracer implementation is expected to maintain its
//! own notion of the current span, registering a span as current on
//! `start_span` and unregistering it on `end`, so that inner spans started
//! while a generation call is in flight attach to the right parent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::GatewayError;

/// Kind of work a span records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// One model generation call (streaming or not).
    Generation,
}

/// Error information recorded on a span.
///
/// `detail` carries the full error text and is only populated when the
/// caller explicitly requested tracing; otherwise only the stable
/// classification label is recorded, so payload-bearing messages do not
/// leak by default.
#[derive(Debug, Clone)]
pub struct SpanError {
    /// Stable error classification label.
    pub classification: String,
    /// Full error detail, present only when tracing was requested.
    pub detail: Option<String>,
}

impl SpanError {
    /// Build span error info from a gateway error.
    pub fn from_error(error: &GatewayError, include_detail: bool) -> Self {
        Self {
            classification: error.classification().to_string(),
            detail: include_detail.then(|| error.to_string()),
        }
    }
}

/// One unit of recorded work.
pub trait SpanHandle: Send + Sync {
    /// Attach the (already serialized) request data to the span.
    fn set_input(&self, data: serde_json::Value);
    /// Attach the (already serialized) response data to the span.
    fn set_output(&self, data: serde_json::Value);
    /// Record an error on the span.
    fn set_error(&self, info: SpanError);
    /// End the span. Implementations must tolerate being called once only;
    /// [`SpanGuard`] guarantees exactly-once ending on every exit path.
    fn end(&self);
}

/// Factory for spans.
pub trait Tracer: Send + Sync {
    /// Start a new span of the given kind and register it as current.
    fn start_span(&self, kind: SpanKind) -> Box<dyn SpanHandle>;
}

/// Tracer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl SpanHandle for NoopSpan {
    fn set_input(&self, _data: serde_json::Value) {}
    fn set_output(&self, _data: serde_json::Value) {}
    fn set_error(&self, _info: SpanError) {}
    fn end(&self) {}
}

impl Tracer for NoopTracer {
    fn start_span(&self, _kind: SpanKind) -> Box<dyn SpanHandle> {
        Box::new(NoopSpan)
    }
}

/// Shared tracer handle.
pub type SharedTracer = Arc<dyn Tracer>;

/// Ends the wrapped span exactly once.
///
/// The guard ends the span when [`SpanGuard::finish`] is called, or on drop
/// if it never was — which is what guarantees span cleanup on early consumer
/// cancellation of a streamed call.
pub struct SpanGuard {
    span: Box<dyn SpanHandle>,
    ended: AtomicBool,
}

impl SpanGuard {
    /// Wrap a freshly started span.
    pub fn new(span: Box<dyn SpanHandle>) -> Self {
        Self {
            span,
            ended: AtomicBool::new(false),
        }
    }

    /// Access the underlying span for annotation.
    pub fn span(&self) -> &dyn SpanHandle {
        self.span.as_ref()
    }

    /// End the span now. Subsequent calls (and the drop path) are no-ops.
    pub fn finish(&self) {
        if !self.ended.swap(true, Ordering::SeqCst) {
            self.span.end();
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.finish();
    }
}
