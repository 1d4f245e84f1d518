//! Outcome of a single tool dispatch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ToolClassification;

/// Category of a failed tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailureKind {
    /// The engine named a tool that is not in the catalogue
    UnknownTool,

    /// Arguments failed schema validation; no collaborator was called
    ValidationError,

    /// The referenced resource or document does not exist
    NotFound,

    /// The collaborator refused the operation
    PermissionDenied,

    /// The collaborator call failed (transport, API error, bad response)
    UpstreamError,

    /// The collaborator did not answer in time
    Timeout,

    /// Requested after the turn ran out of tool rounds; never executed
    RoundLimitReached,
}

impl ToolFailureKind {
    /// Returns true if retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamError | Self::Timeout)
    }
}

/// Result of one tool call: either the collaborator's payload or a
/// structured failure. Failures are data and never abort a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success {
        payload: Value,
    },
    Failure {
        kind: ToolFailureKind,
        message: String,
        classification: ToolClassification,
    },
}

impl ToolOutcome {
    /// Creates a success outcome.
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    /// Creates a failure outcome.
    pub fn failure(
        kind: ToolFailureKind,
        message: impl Into<String>,
        classification: ToolClassification,
    ) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
            classification,
        }
    }

    /// Returns true if the tool succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The JSON fed back to the reasoning engine as the tool result.
    ///
    /// Read failures render as `{"error": ...}`; destructive failures add
    /// `"status": "failed"`.
    pub fn payload(&self) -> Value {
        match self {
            Self::Success { payload } => payload.clone(),
            Self::Failure {
                message,
                classification,
                ..
            } => match classification {
                ToolClassification::Read => json!({ "error": message }),
                ToolClassification::Destructive => json!({ "error": message, "status": "failed" }),
            },
        }
    }
}
