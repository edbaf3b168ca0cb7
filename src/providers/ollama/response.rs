//! Non-streaming response normalization for the Ollama backend.

use super::types::{OllamaChatResponse, OllamaToolCall};
use crate::ids;
use crate::types::{
    CallStatus, ContentPart, FunctionCallOutput, MessageRole, ModelResponse, OutputItem, Usage,
};

/// Convert one complete backend response into the canonical shape.
///
/// A message output is emitted when content is non-empty, or when there is
/// nothing else to emit (no tool calls). When tool calls arrive with empty
/// content, the spurious empty message is suppressed and only the function
/// calls are emitted. A refusal replaces the text part.
pub fn convert_chat_response(response: &OllamaChatResponse) -> ModelResponse {
    let message = &response.message;
    let tool_calls: &[OllamaToolCall] = message.tool_calls.as_deref().unwrap_or_default();

    let mut output = Vec::with_capacity(1 + tool_calls.len());

    if !message.content.is_empty() || tool_calls.is_empty() {
        let part = match &message.refusal {
            Some(refusal) => ContentPart::refusal(refusal.clone()),
            None => ContentPart::output_text(message.content.clone()),
        };
        output.push(OutputItem::Message {
            role: MessageRole::Assistant,
            content: vec![part],
        });
    }

    for call in tool_calls {
        output.push(OutputItem::FunctionCall(convert_tool_call(call)));
    }

    ModelResponse {
        output,
        usage: Usage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        ),
        response_id: ids::completion_id(),
    }
}

/// Convert one backend tool call, regenerating non-canonical call IDs.
pub(crate) fn convert_tool_call(call: &OllamaToolCall) -> FunctionCallOutput {
    FunctionCallOutput {
        name: call.function.name.clone(),
        arguments: arguments_to_string(&call.function.arguments),
        call_id: ids::canonical_tool_call_id(call.id.as_deref()),
        status: CallStatus::Completed,
    }
}

/// Render backend arguments as a JSON string. Raw strings (from payloads
/// that were never valid JSON) pass through unchanged.
pub(crate) fn arguments_to_string(arguments: &serde_json::Value) -> String {
    match arguments {
        serde_json::Value::String(raw) => raw.clone(),
        value => value.to_string(),
    }
}
