//! Result of one agent turn.

use serde::{Deserialize, Serialize};

use super::{ToolInvocationRecord, UsageCounter};

/// What a completed turn returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Final natural-language answer
    pub response: String,

    /// Every tool call made during the turn, in the order the engine requested them
    pub tool_calls: Vec<ToolInvocationRecord>,

    pub model: String,

    /// `None` when the engine reported no usage at all
    pub usage: Option<UsageCounter>,
}

impl AgentResponse {
    /// Number of tool calls that failed.
    pub fn failed_tool_calls(&self) -> usize {
        self.tool_calls.iter().filter(|r| !r.is_success()).count()
    }
}
