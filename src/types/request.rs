//! Canonical request types.
//!
//! A [`ModelRequest`] is owned by the caller and read-only to the gateway;
//! adapters translate it into their backend's native shape without mutating
//! it.

use serde::{Deserialize, Serialize};

use super::tools::{Handoff, ToolInput};

/// Canonical generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Conversation input: a bare string (one user turn) or an ordered item
    /// sequence.
    pub input: ModelInput,
    /// Optional system instructions, prepended as the first message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<String>,
    /// Tools available to the model. Two historically different declaration
    /// shapes are accepted, see [`ToolInput`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolInput>,
    /// Agent-transfer declarations, each exposed to the model as a tool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handoffs: Vec<Handoff>,
    /// Sampling and reasoning settings.
    #[serde(default)]
    pub model_settings: ModelSettings,
    /// Whether the caller explicitly requested tracing. Controls whether
    /// payload-bearing data (inputs, outputs, full error text) is recorded
    /// on spans.
    #[serde(default)]
    pub tracing_enabled: bool,
}

impl ModelRequest {
    /// Build a request from a single user turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: ModelInput::Text(text.into()),
            ..Default::default()
        }
    }

    /// Build a request from an item sequence.
    pub fn from_items(items: Vec<InputItem>) -> Self {
        Self {
            input: ModelInput::Items(items),
            ..Default::default()
        }
    }

    /// Set the system instructions.
    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = Some(instructions.into());
        self
    }

    /// Set the tool list.
    pub fn with_tools(mut self, tools: Vec<ToolInput>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the handoff list.
    pub fn with_handoffs(mut self, handoffs: Vec<Handoff>) -> Self {
        self.handoffs = handoffs;
        self
    }

    /// Set the model settings.
    pub fn with_model_settings(mut self, model_settings: ModelSettings) -> Self {
        self.model_settings = model_settings;
        self
    }

    /// Enable tracing for this request.
    pub fn with_tracing(mut self, tracing_enabled: bool) -> Self {
        self.tracing_enabled = tracing_enabled;
        self
    }
}

/// Request input: a plain string or an ordered sequence of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelInput {
    /// A single user turn.
    Text(String),
    /// Heterogeneous conversation items in order.
    Items(Vec<InputItem>),
}

impl Default for ModelInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// One conversation item.
///
/// Variant order matters for untagged deserialization: the tool-invocation
/// and tool-result shapes are keyed by their required fields and must be
/// tried before the generic message shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputItem {
    /// An assistant tool invocation replayed into the conversation history.
    FunctionCall(FunctionCallItem),
    /// The result of a tool execution, keyed by the originating call ID.
    FunctionResult(FunctionResultItem),
    /// A generic role-tagged message.
    Message(MessageItem),
}

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// Developer instructions (treated as system by backends without the
    /// distinction).
    Developer,
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
    /// Tool execution result.
    Tool,
}

/// A generic role-tagged message.
///
/// The text may arrive under either `content` or `text`; [`MessageItem::text`]
/// resolves whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageItem {
    /// Message role.
    pub role: MessageRole,
    /// Message text under its common key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Message text under its legacy key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl MessageItem {
    /// Create a message item with text under `content`.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            text: None,
        }
    }

    /// Resolve the message text from whichever field carries it.
    pub fn text(&self) -> &str {
        self.content
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

/// An assistant tool invocation item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallItem {
    /// Call ID linking this invocation to its result.
    pub call_id: String,
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON-encoded string.
    pub arguments: String,
}

/// A tool-result item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResultItem {
    /// Call ID of the invocation this result answers.
    pub call_id: String,
    /// Tool output text.
    pub output: String,
}

/// Sampling and reasoning settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling probability mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Frequency penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Reasoning configuration; see [`ReasoningSetting`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningSetting>,
    /// Tool choice strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Random seed for reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Reasoning setting, accepted in both of its historical shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReasoningSetting {
    /// Legacy boolean form; `false` disables reasoning outright.
    Flag(bool),
    /// Effort form: `{"effort": "low"}`. An explicit `effort: null` disables
    /// reasoning.
    Config {
        /// Requested reasoning effort, or `None` to disable.
        effort: Option<ReasoningEffort>,
    },
}

/// Requested reasoning effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Lowest effort; backends without the level receive their lowest one.
    Minimal,
    /// Low effort.
    Low,
    /// Medium effort.
    Medium,
    /// High effort.
    High,
}

/// Tool choice strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides whether to call tools.
    Auto,
    /// Model must call at least one tool.
    Required,
    /// Model cannot call any tool.
    None,
}
