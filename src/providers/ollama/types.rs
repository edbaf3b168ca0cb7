//! Ollama wire types (chat request/response and stream chunks).
//!
//! Structures mirror the `/api/chat` JSON shapes. Response types keep
//! fields we do not currently surface so parsing stays compatible with
//! newer server versions.

use serde::{Deserialize, Serialize};

/// Request body for `/api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    /// Model identifier, possibly with a tag (`llama3.2:latest`).
    pub model: String,
    /// Conversation messages in order.
    pub messages: Vec<OllamaChatMessage>,
    /// Tool declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OllamaTool>>,
    /// Whether the server should stream the response.
    pub stream: bool,
    /// Output format constraint (`"json"` or a JSON schema).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    /// Runtime options (temperature, penalties, stop, seed, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Map<String, serde_json::Value>>,
    /// How long the model stays loaded after the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
    /// Thinking behavior: a boolean or an effort level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<ThinkValue>,
}

/// Value of the `think` request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThinkValue {
    /// Enable or disable thinking outright.
    Enabled(bool),
    /// Request a specific effort level (`"low"`, `"medium"`, `"high"`).
    Level(String),
}

/// One chat message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatMessage {
    /// Message role (`system`, `user`, `assistant`, `tool`).
    pub role: String,
    /// Message text.
    #[serde(default)]
    pub content: String,
    /// Tool invocations attached to an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OllamaToolCall>>,
    /// Call ID a tool-role message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Model thinking text, when thinking was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    /// Refusal text sent by OpenAI-compatible servers instead of content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

impl OllamaChatMessage {
    /// Create a plain text message.
    pub fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
            thinking: None,
            refusal: None,
        }
    }
}

/// One tool invocation on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaToolCall {
    /// Backend-assigned call ID, when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The invoked function.
    pub function: OllamaFunctionCall,
}

/// Function name and arguments of a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaFunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments as parsed JSON, or a raw string when the payload was not
    /// valid JSON.
    pub arguments: serde_json::Value,
}

/// One tool declaration on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaTool {
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The declared function.
    pub function: OllamaFunction,
}

/// Function declaration of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaFunction {
    /// Function name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for the arguments.
    pub parameters: serde_json::Value,
}

/// Complete (non-streaming) response from `/api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChatResponse {
    /// Model that produced the response.
    #[serde(default)]
    pub model: Option<String>,
    /// The assistant message.
    pub message: OllamaChatMessage,
    /// Whether generation finished.
    #[serde(default)]
    pub done: bool,
    /// Why generation finished (`stop`, `length`, ...).
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Prompt token count.
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// Completion token count.
    #[serde(default)]
    pub eval_count: Option<u32>,
    /// Total wall time in nanoseconds.
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Model load time in nanoseconds.
    #[serde(default)]
    pub load_duration: Option<u64>,
}

/// One streamed chunk from `/api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChunk {
    /// Model that produced the chunk.
    #[serde(default)]
    pub model: Option<String>,
    /// Incremental message payload.
    #[serde(default)]
    pub message: Option<OllamaChunkMessage>,
    /// Whether this is the final chunk.
    #[serde(default)]
    pub done: Option<bool>,
    /// Why generation finished, on the final chunk.
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Prompt token count, usually only on the final chunk.
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// Completion token count, usually only on the final chunk.
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Message payload of a streamed chunk. Everything is optional; servers
/// omit whatever a chunk does not carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaChunkMessage {
    /// Message role.
    #[serde(default)]
    pub role: Option<String>,
    /// Incremental text.
    #[serde(default)]
    pub content: Option<String>,
    /// Completed tool invocations.
    #[serde(default)]
    pub tool_calls: Option<Vec<OllamaToolCall>>,
    /// Incremental thinking text.
    #[serde(default)]
    pub thinking: Option<String>,
}
