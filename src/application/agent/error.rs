//! Errors raised inside the agent subsystem.

use thiserror::Error;

use crate::domain::agent::{ToolFailureKind, UnknownToolError};
use crate::domain::foundation::ValidationError;
use crate::ports::{AIError, ClusterError, DocumentSearchError};

/// Failure of a single tool call.
///
/// Never escapes the dispatcher: it is converted into a failed
/// [`ToolOutcome`](crate::domain::agent::ToolOutcome) and fed back to the engine.
#[derive(Debug, Clone, Error)]
pub enum ToolExecutionError {
    #[error("{0}")]
    UnknownTool(#[from] UnknownToolError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Cluster(#[from] ClusterError),

    #[error("{0}")]
    Documents(#[from] DocumentSearchError),

    #[error("tool timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("could not encode tool result: {0}")]
    Serialization(String),
}

impl ToolExecutionError {
    /// Maps the error onto the recorded failure category.
    pub fn kind(&self) -> ToolFailureKind {
        match self {
            Self::UnknownTool(_) => ToolFailureKind::UnknownTool,
            Self::Validation(_) => ToolFailureKind::ValidationError,
            Self::Cluster(ClusterError::NotFound(_)) => ToolFailureKind::NotFound,
            Self::Cluster(ClusterError::Forbidden(_)) => ToolFailureKind::PermissionDenied,
            Self::Cluster(_) | Self::Documents(_) | Self::Serialization(_) => {
                ToolFailureKind::UpstreamError
            }
            Self::Timeout { .. } => ToolFailureKind::Timeout,
        }
    }
}

impl From<serde_json::Error> for ToolExecutionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Turn-level failure. Propagates to the caller.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("reasoning engine error: {0}")]
    Engine(#[from] AIError),

    #[error("reasoning engine did not respond within {timeout_secs}s")]
    EngineTimeout { timeout_secs: u64 },
}

impl AgentError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::EngineTimeout { .. } | Self::Engine(AIError::Timeout { .. })
        )
    }
}
