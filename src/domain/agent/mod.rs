//! Agent domain - tools, conversation context and usage accounting.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] / [`ToolRegistry`] - Schema and lookup for tools
//! - [`TOOL_CATALOG`] - The fixed set of tools offered to the engine
//! - [`ToolArguments`] - Validated, typed arguments for one call
//! - [`ToolCall`] - Engine request with argument normalization
//! - [`ToolOutcome`] / [`ToolInvocationRecord`] - Isolated result and audit entry
//! - [`ConversationContextBuilder`] - Prompt synthesis from history
//! - [`UsageAccountant`] - Token totals across a turn

mod catalog;
mod conversation;
mod response;
mod system_prompt;
pub mod tool_arguments;
mod tool_call;
mod tool_definition;
mod tool_invocation;
mod tool_name;
mod tool_outcome;
mod tool_registry;
mod usage;

pub use catalog::{build_catalog, TOOL_CATALOG};
pub use conversation::{
    ConversationContextBuilder, ConversationMessage, ConversationRole, DEFAULT_GREETING_MARKER,
};
pub use response::AgentResponse;
pub use system_prompt::SRE_SYSTEM_PROMPT;
pub use tool_arguments::{DeleteArgs, EventsArgs, ListArgs, PodLogsArgs, SearchArgs, ToolArguments};
pub use tool_call::ToolCall;
pub use tool_definition::{ToolClassification, ToolDefinition};
pub use tool_invocation::ToolInvocationRecord;
pub use tool_name::{ToolName, UnknownToolError};
pub use tool_outcome::{ToolFailureKind, ToolOutcome};
pub use tool_registry::ToolRegistry;
pub use usage::{UsageAccountant, UsageCounter};
