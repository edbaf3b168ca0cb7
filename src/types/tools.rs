//! Tool and handoff declarations accepted by the gateway.
//!
//! Tools arrive in one of two historically different shapes, both accepted
//! transparently. Classification into the normalized form happens in one
//! place ([`ToolInput::classify`]); payloads matching neither shape are
//! skipped by the translators, never failing the whole request.

use serde::{Deserialize, Serialize};

/// Incoming tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolInput {
    /// Chat-completions style declaration:
    /// `{"type": "function", "name": ..., "description": ..., "parameters": {...}}`.
    Function(FunctionDecl),
    /// Agent-toolkit style declaration:
    /// `{"name": ..., "params_json_schema": {...}}`.
    Schema(SchemaDecl),
    /// Anything else; skipped (with a log line) during translation.
    Other(serde_json::Value),
}

impl ToolInput {
    /// Create a chat-completions style function tool.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self::Function(FunctionDecl {
            kind: FunctionTag::Function,
            name: name.into(),
            description: Some(description.into()),
            parameters: Some(parameters),
        })
    }

    /// Create an agent-toolkit style tool from a name and schema.
    pub fn schema(
        name: impl Into<String>,
        description: impl Into<String>,
        params_json_schema: serde_json::Value,
    ) -> Self {
        Self::Schema(SchemaDecl {
            name: name.into(),
            description: Some(description.into()),
            params_json_schema,
        })
    }

    /// Classify this declaration into the normalized definition.
    ///
    /// Returns `None` for payloads matching neither accepted shape; callers
    /// skip those rather than failing the request.
    pub fn classify(&self) -> Option<ToolDefinition> {
        match self {
            Self::Function(decl) => Some(ToolDefinition {
                name: decl.name.clone(),
                description: decl.description.clone().unwrap_or_default(),
                parameters: decl
                    .parameters
                    .clone()
                    .unwrap_or_else(default_parameters_schema),
            }),
            Self::Schema(decl) => Some(ToolDefinition {
                name: decl.name.clone(),
                description: decl.description.clone().unwrap_or_default(),
                parameters: decl.params_json_schema.clone(),
            }),
            Self::Other(_) => None,
        }
    }
}

fn default_parameters_schema() -> serde_json::Value {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Marker for the `"type": "function"` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionTag {
    /// The only accepted value.
    #[serde(rename = "function")]
    Function,
}

/// Chat-completions style tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Declaration discriminator, always `"function"`.
    #[serde(rename = "type")]
    pub kind: FunctionTag,
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the tool's arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Agent-toolkit style tool declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDecl {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the tool's arguments.
    pub params_json_schema: serde_json::Value,
}

/// Normalized tool definition produced by classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for the tool's arguments.
    pub parameters: serde_json::Value,
}

/// A declared capability to transfer the conversation to another agent,
/// exposed to the model as a callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handoff {
    /// Name of the transfer tool, e.g. `transfer_to_weather_assistant`.
    pub tool_name: String,
    /// Description shown to the model.
    pub tool_description: String,
    /// JSON schema for the transfer tool's arguments.
    pub input_json_schema: serde_json::Value,
}

impl Handoff {
    /// Create a handoff declaration.
    pub fn new(
        tool_name: impl Into<String>,
        tool_description: impl Into<String>,
        input_json_schema: serde_json::Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_description: tool_description.into(),
            input_json_schema,
        }
    }

    /// Convert into the normalized tool definition presented to the model.
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.tool_name.clone(),
            description: self.tool_description.clone(),
            parameters: self.input_json_schema.clone(),
        }
    }
}
