//! Canonical request/response/event types shared by all adapters.

mod request;
mod response;
mod streaming;
mod tools;
mod usage;

pub use request::{
    FunctionCallItem, FunctionResultItem, InputItem, MessageItem, MessageRole, ModelInput,
    ModelRequest, ModelSettings, ReasoningEffort, ReasoningSetting, ToolChoice,
};
pub use response::{CallStatus, ContentPart, FunctionCallOutput, ModelResponse, OutputItem};
pub use streaming::{EventStream, StreamEvent};
pub use tools::{FunctionDecl, FunctionTag, Handoff, SchemaDecl, ToolDefinition, ToolInput};
pub use usage::Usage;
