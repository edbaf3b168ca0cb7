//! Request translation for the Ollama backend.
//!
//! Converts canonical input (string or item sequence), tools, handoffs, and
//! system instructions into an `/api/chat` request body. Malformed tool
//! declarations are skipped with a log line; a request is never failed for
//! one bad tool.

use super::params::{build_model_options, map_reasoning};
use super::types::{
    OllamaChatMessage, OllamaChatRequest, OllamaFunction, OllamaFunctionCall, OllamaTool,
    OllamaToolCall,
};
use crate::error::GatewayError;
use crate::types::{
    Handoff, InputItem, MessageRole, ModelInput, ModelRequest, ToolDefinition, ToolInput,
};

/// Build an `/api/chat` request body from a canonical request.
pub fn build_chat_request(
    model: &str,
    request: &ModelRequest,
    keep_alive: Option<&str>,
    format: Option<&serde_json::Value>,
    stream: bool,
) -> Result<OllamaChatRequest, GatewayError> {
    if model.is_empty() {
        return Err(GatewayError::ConfigurationError(
            "Model is required".to_string(),
        ));
    }

    let mut messages = convert_input(&request.input);
    if let Some(instructions) = &request.system_instructions {
        messages.insert(0, OllamaChatMessage::text("system", instructions.clone()));
    }

    if request.model_settings.tool_choice.is_some() {
        tracing::debug!("tool_choice is not supported by the ollama backend; ignoring");
    }

    let options = build_model_options(&request.model_settings);

    Ok(OllamaChatRequest {
        model: model.to_string(),
        messages,
        tools: convert_tools(&request.tools, &request.handoffs),
        stream,
        format: format.cloned(),
        options: (!options.is_empty()).then_some(options),
        keep_alive: keep_alive.map(str::to_string),
        think: map_reasoning(request.model_settings.reasoning.as_ref()),
    })
}

/// Convert canonical input into the backend message list.
fn convert_input(input: &ModelInput) -> Vec<OllamaChatMessage> {
    match input {
        ModelInput::Text(text) => vec![OllamaChatMessage::text("user", text.clone())],
        ModelInput::Items(items) => items.iter().map(convert_item).collect(),
    }
}

/// Convert one conversation item. One exhaustive match site.
fn convert_item(item: &InputItem) -> OllamaChatMessage {
    match item {
        InputItem::Message(message) => {
            OllamaChatMessage::text(role_name(message.role), message.text())
        }
        InputItem::FunctionResult(result) => OllamaChatMessage {
            role: "tool".to_string(),
            content: result.output.clone(),
            tool_calls: None,
            tool_call_id: Some(result.call_id.clone()),
            thinking: None,
            refusal: None,
        },
        InputItem::FunctionCall(call) => OllamaChatMessage {
            role: "assistant".to_string(),
            content: String::new(),
            tool_calls: Some(vec![OllamaToolCall {
                id: Some(call.call_id.clone()),
                function: OllamaFunctionCall {
                    name: call.name.clone(),
                    arguments: parse_arguments(&call.arguments),
                },
            }]),
            tool_call_id: None,
            thinking: None,
            refusal: None,
        },
    }
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System | MessageRole::Developer => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

/// Parse a JSON-encoded argument string, passing the raw string through
/// unchanged when it is not valid JSON. Never errors.
fn parse_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Translate tools and handoffs into backend declarations.
///
/// Declarations matching neither accepted shape are skipped with a warning.
/// Handoff-derived tools are appended after ordinary tools. An empty result
/// omits the field entirely.
fn convert_tools(tools: &[ToolInput], handoffs: &[Handoff]) -> Option<Vec<OllamaTool>> {
    let mut declarations: Vec<OllamaTool> = Vec::with_capacity(tools.len() + handoffs.len());

    for tool in tools {
        match tool.classify() {
            Some(definition) => declarations.push(to_ollama_tool(definition)),
            None => {
                tracing::warn!(payload = ?tool, "skipping unrecognized tool declaration");
            }
        }
    }
    for handoff in handoffs {
        declarations.push(to_ollama_tool(handoff.to_tool_definition()));
    }

    (!declarations.is_empty()).then_some(declarations)
}

fn to_ollama_tool(definition: ToolDefinition) -> OllamaTool {
    OllamaTool {
        tool_type: "function".to_string(),
        function: OllamaFunction {
            name: definition.name,
            description: definition.description,
            parameters: definition.parameters,
        },
    }
}
