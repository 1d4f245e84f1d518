//! Agent loop configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound accepted for `max_tool_rounds`.
pub const MAX_TOOL_ROUNDS_LIMIT: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Rounds in which the engine may call tools before it must answer
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    #[serde(default = "default_engine_timeout")]
    pub engine_timeout_secs: u64,

    /// Substring identifying the canned greeting in chat history
    #[serde(default = "default_greeting_marker")]
    pub greeting_marker: String,
}

impl AgentConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_tool_rounds == 0 || self.max_tool_rounds > MAX_TOOL_ROUNDS_LIMIT {
            return Err(ValidationError::InvalidToolRounds {
                max: MAX_TOOL_ROUNDS_LIMIT,
            });
        }
        if self.tool_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("agent.tool_timeout_secs"));
        }
        if self.engine_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("agent.engine_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            tool_timeout_secs: default_tool_timeout(),
            engine_timeout_secs: default_engine_timeout(),
            greeting_marker: default_greeting_marker(),
        }
    }
}

fn default_max_tool_rounds() -> u32 {
    10
}

fn default_tool_timeout() -> u64 {
    30
}

fn default_engine_timeout() -> u64 {
    90
}

fn default_greeting_marker() -> String {
    crate::domain::agent::DEFAULT_GREETING_MARKER.to_string()
}
