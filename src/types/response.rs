//! Canonical response types.

use serde::{Deserialize, Serialize};

use super::request::MessageRole;
use super::usage::Usage;

/// Canonical generation response. Produced fresh per call; no identity
/// persists across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Ordered output items.
    pub output: Vec<OutputItem>,
    /// Token usage for this call.
    pub usage: Usage,
    /// Completion ID (`chatcmpl-` + 29 alphanumerics).
    pub response_id: String,
}

impl ModelResponse {
    /// Concatenated text of all output-text parts, or `None` when the
    /// response carries no text.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        let mut found = false;
        for item in &self.output {
            if let OutputItem::Message { content, .. } = item {
                for part in content {
                    if let ContentPart::OutputText { text, .. } = part {
                        out.push_str(text);
                        found = true;
                    }
                }
            }
        }
        found.then_some(out)
    }

    /// All function-call outputs in order.
    pub fn function_calls(&self) -> Vec<&FunctionCallOutput> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall(call) => Some(call),
                OutputItem::Message { .. } => None,
            })
            .collect()
    }
}

/// One canonical output item.
///
/// Invariant: a response never contains both a refusal part and a function
/// call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// A message produced by the model.
    Message {
        /// Message role, always assistant for model output.
        role: MessageRole,
        /// Content parts in order.
        content: Vec<ContentPart>,
    },
    /// A tool invocation requested by the model.
    FunctionCall(FunctionCallOutput),
}

/// One content part of a message output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain model text.
    OutputText {
        /// The text.
        text: String,
        /// Raw provider payload this part was derived from, for diagnostics.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_raw: Option<serde_json::Value>,
    },
    /// The model declined to answer.
    Refusal {
        /// Refusal text.
        refusal: String,
        /// Raw provider payload this part was derived from, for diagnostics.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_raw: Option<serde_json::Value>,
    },
}

impl ContentPart {
    /// Create a plain output-text part.
    pub fn output_text(text: impl Into<String>) -> Self {
        Self::OutputText {
            text: text.into(),
            provider_raw: None,
        }
    }

    /// Create a refusal part.
    pub fn refusal(refusal: impl Into<String>) -> Self {
        Self::Refusal {
            refusal: refusal.into(),
            provider_raw: None,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallOutput {
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON-encoded string.
    pub arguments: String,
    /// Canonical call ID (`call_` + 24 alphanumerics).
    pub call_id: String,
    /// Call status.
    pub status: CallStatus,
}

/// Status of a function call output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Arguments are fully assembled.
    Completed,
    /// Arguments are still streaming in.
    InProgress,
}
