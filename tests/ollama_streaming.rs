//! Streaming tests: scripted backends, a mock HTTP server, and span
//! lifecycle guarantees.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::StreamExt;
use modelgate::GatewayError;
use modelgate::provider::{Model, Provider};
use modelgate::providers::ollama::{
    OllamaBackend, OllamaConfig, OllamaProvider,
};
use modelgate::providers::ollama::types::{OllamaChatRequest, OllamaChatResponse};
use modelgate::streaming::{ChunkStream, chunk_stream_from_iter};
use modelgate::telemetry::{SpanError, SpanHandle, SpanKind, Tracer};
use modelgate::types::{ModelRequest, StreamEvent};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backend replaying a fixed chunk script.
struct ScriptedBackend {
    chunks: Vec<serde_json::Value>,
}

#[async_trait]
impl OllamaBackend for ScriptedBackend {
    async fn chat(
        &self,
        _request: &OllamaChatRequest,
    ) -> Result<OllamaChatResponse, GatewayError> {
        Err(GatewayError::UnsupportedOperation(
            "scripted backend only streams".to_string(),
        ))
    }

    async fn chat_stream(
        &self,
        _request: &OllamaChatRequest,
    ) -> Result<ChunkStream, GatewayError> {
        Ok(chunk_stream_from_iter(
            self.chunks.clone().into_iter().map(Ok),
        ))
    }
}

/// Tracer recording span lifecycle events.
#[derive(Clone, Default)]
struct RecordingTracer {
    events: Arc<Mutex<Vec<String>>>,
}

struct RecordingSpan {
    events: Arc<Mutex<Vec<String>>>,
}

impl SpanHandle for RecordingSpan {
    fn set_input(&self, _data: serde_json::Value) {
        self.events.lock().unwrap().push("input".into());
    }
    fn set_output(&self, _data: serde_json::Value) {
        self.events.lock().unwrap().push("output".into());
    }
    fn set_error(&self, info: SpanError) {
        let detail = if info.detail.is_some() { "detailed" } else { "classified" };
        self.events
            .lock()
            .unwrap()
            .push(format!("error:{}:{detail}", info.classification));
    }
    fn end(&self) {
        self.events.lock().unwrap().push("end".into());
    }
}

impl Tracer for RecordingTracer {
    fn start_span(&self, _kind: SpanKind) -> Box<dyn SpanHandle> {
        Box::new(RecordingSpan {
            events: self.events.clone(),
        })
    }
}

fn scripted_model(chunks: Vec<serde_json::Value>) -> (OllamaProvider, RecordingTracer) {
    let tracer = RecordingTracer::default();
    let provider = OllamaProvider::new(OllamaConfig::default())
        .with_backend(Arc::new(ScriptedBackend { chunks }))
        .with_tracer(Arc::new(tracer.clone()));
    (provider, tracer)
}

fn text_chunks() -> Vec<serde_json::Value> {
    vec![
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "Hel"}, "done": false}),
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "lo "}, "done": false}),
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "world"}, "done": false}),
        json!({"model": "gpt-oss:20b", "done": true, "prompt_eval_count": 10, "eval_count": 20}),
    ]
}

#[tokio::test]
async fn a_text_stream_produces_the_canonical_sequence() {
    let (provider, _) = scripted_model(text_chunks());
    let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
    let stream = model
        .get_streamed_response(&ModelRequest::from_text("hi"))
        .await
        .unwrap();
    let events: Vec<StreamEvent> = stream.map(|e| e.unwrap()).collect().await;

    assert!(matches!(events[0], StreamEvent::ResponseStarted));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, StreamEvent::ResponseStarted))
            .count(),
        1
    );

    let deltas: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::OutputTextDelta { delta } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(deltas, ["Hel", "lo ", "world"]);

    match events.last().unwrap() {
        StreamEvent::ResponseDone { response } => {
            assert_eq!(response.text().as_deref(), Some("Hello world"));
            assert_eq!(response.usage.input_tokens, 10);
            assert_eq!(response.usage.output_tokens, 20);
            assert_eq!(response.usage.total_tokens, 30);
        }
        other => panic!("expected ResponseDone, got {other:?}"),
    }
}

#[tokio::test]
async fn a_tool_call_terminates_the_stream() {
    let (provider, _) = scripted_model(vec![
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": ""}, "done": false}),
        json!({
            "model": "gpt-oss:20b",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    {"function": {"name": "get_weather", "arguments": {"city": "Oakland"}}}
                ]
            },
            "done": false
        }),
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "never seen"}, "done": false}),
    ]);
    let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
    let stream = model
        .get_streamed_response(&ModelRequest::from_text("weather?"))
        .await
        .unwrap();
    let events: Vec<StreamEvent> = stream.map(|e| e.unwrap()).collect().await;

    let done_index = events
        .iter()
        .position(|e| matches!(e, StreamEvent::ResponseDone { .. }))
        .expect("terminal event");
    assert_eq!(done_index, events.len() - 1, "no events after ResponseDone");

    match &events[done_index] {
        StreamEvent::ResponseDone { response } => {
            let calls = response.function_calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].name, "get_weather");
            assert!(
                calls[0].call_id.starts_with("call_"),
                "unexpected call id: {}",
                calls[0].call_id
            );
            assert_eq!(calls[0].call_id.len(), "call_".len() + 24);
            assert!(response.text().is_none());
        }
        other => panic!("expected ResponseDone, got {other:?}"),
    }
}

#[tokio::test]
async fn the_span_is_ended_on_normal_completion() {
    let (provider, tracer) = scripted_model(text_chunks());
    let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
    let stream = model
        .get_streamed_response(&ModelRequest::from_text("hi"))
        .await
        .unwrap();
    let _ = stream.collect::<Vec<_>>().await;

    let events = tracer.events.lock().unwrap();
    assert_eq!(events.iter().filter(|e| *e == "end").count(), 1);
}

#[tokio::test]
async fn the_span_is_ended_when_the_consumer_stops_early() {
    let (provider, tracer) = scripted_model(text_chunks());
    let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
    let mut stream = model
        .get_streamed_response(&ModelRequest::from_text("hi"))
        .await
        .unwrap();

    // Pull a couple of events, then walk away.
    let _ = stream.next().await;
    let _ = stream.next().await;
    drop(stream);

    let events = tracer.events.lock().unwrap();
    assert_eq!(
        events.iter().filter(|e| *e == "end").count(),
        1,
        "span must end when the consumer cancels: {events:?}"
    );
}

#[tokio::test]
async fn error_detail_is_only_recorded_when_tracing_was_requested() {
    for (tracing_enabled, expected) in [(false, "error:stream_error:classified"),
                                        (true, "error:stream_error:detailed")] {
        let tracer = RecordingTracer::default();
        let provider = OllamaProvider::new(OllamaConfig::default())
            .with_backend(Arc::new(ErroringBackend))
            .with_tracer(Arc::new(tracer.clone()));
        let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
        let stream = model
            .get_streamed_response(
                &ModelRequest::from_text("hi").with_tracing(tracing_enabled),
            )
            .await
            .unwrap();
        let events: Vec<_> = stream.collect().await;
        assert!(matches!(
            events.last().unwrap(),
            Err(GatewayError::StreamError(_))
        ));

        let spans = tracer.events.lock().unwrap();
        assert!(
            spans.iter().any(|e| e == expected),
            "expected {expected} in {spans:?}"
        );
        assert_eq!(spans.iter().filter(|e| *e == "end").count(), 1);
    }
}

struct ErroringBackend;

#[async_trait]
impl OllamaBackend for ErroringBackend {
    async fn chat(
        &self,
        _request: &OllamaChatRequest,
    ) -> Result<OllamaChatResponse, GatewayError> {
        Err(GatewayError::UnsupportedOperation("streams only".into()))
    }

    async fn chat_stream(
        &self,
        _request: &OllamaChatRequest,
    ) -> Result<ChunkStream, GatewayError> {
        Ok(chunk_stream_from_iter(vec![
            Ok(json!({"model": "m", "message": {"role": "assistant", "content": "He"}, "done": false})),
            Err(GatewayError::StreamError("connection reset".into())),
        ]))
    }
}

#[tokio::test]
async fn streaming_works_over_http() {
    let body = [
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "Hel"}, "done": false}),
        json!({"model": "gpt-oss:20b", "message": {"role": "assistant", "content": "lo"}, "done": false}),
        json!({"model": "gpt-oss:20b", "done": true, "prompt_eval_count": 4, "eval_count": 2}),
    ]
    .iter()
    .map(|chunk| chunk.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(OllamaConfig::new().with_base_url(server.uri()));
    let model = provider.get_model(Some("gpt-oss:20b")).await.unwrap();
    let stream = model
        .get_streamed_response(&ModelRequest::from_text("hi"))
        .await
        .unwrap();
    let events: Vec<StreamEvent> = stream.map(|e| e.unwrap()).collect().await;

    assert!(matches!(events[0], StreamEvent::ResponseStarted));
    match events.last().unwrap() {
        StreamEvent::ResponseDone { response } => {
            assert_eq!(response.text().as_deref(), Some("Hello"));
            assert_eq!(response.usage.total_tokens, 6);
        }
        other => panic!("expected ResponseDone, got {other:?}"),
    }
}
