//! Tool invocation record - audit entry for every tool call in a turn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{Timestamp, ToolInvocationId};

use super::ToolOutcome;

/// A recorded tool invocation.
///
/// One record exists for every tool call the engine requested, including
/// calls to unknown tools and calls whose arguments failed validation.
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRecord {
    id: ToolInvocationId,

    /// Engine-assigned call id
    call_id: String,

    /// Tool name as requested by the engine
    #[serde(rename = "tool")]
    tool_name: String,

    /// Resolved arguments; the normalized raw mapping when validation failed
    arguments: Map<String, Value>,

    outcome: ToolOutcome,

    invoked_at: Timestamp,

    duration_ms: u32,
}

impl ToolInvocationRecord {
    /// Records a completed invocation that started at `invoked_at`.
    pub fn new(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: Map<String, Value>,
        outcome: ToolOutcome,
        invoked_at: Timestamp,
    ) -> Self {
        let duration_ms = Timestamp::now()
            .duration_since(&invoked_at)
            .num_milliseconds()
            .max(0) as u32;

        Self {
            id: ToolInvocationId::new(),
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments,
            outcome,
            invoked_at,
            duration_ms,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns the unique identifier.
    pub fn id(&self) -> ToolInvocationId {
        self.id
    }

    /// Returns the engine-assigned call id.
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Returns the tool name.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the recorded arguments.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> &ToolOutcome {
        &self.outcome
    }

    /// Returns when the tool was invoked.
    pub fn invoked_at(&self) -> Timestamp {
        self.invoked_at
    }

    /// Returns the execution duration in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Returns true if the invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::{ToolClassification, ToolFailureKind};
    use serde_json::json;

    fn args() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("namespace".to_string(), json!("kube-system"));
        map
    }

    #[test]
    fn new_records_call_details() {
        let record = ToolInvocationRecord::new(
            "call_1",
            "get_pods",
            args(),
            ToolOutcome::success(json!({"count": 0})),
            Timestamp::now(),
        );

        assert_eq!(record.call_id(), "call_1");
        assert_eq!(record.tool_name(), "get_pods");
        assert_eq!(record.arguments()["namespace"], "kube-system");
        assert!(record.is_success());
    }

    #[test]
    fn failures_are_recorded() {
        let record = ToolInvocationRecord::new(
            "call_2",
            "delete_pod",
            Map::new(),
            ToolOutcome::failure(
                ToolFailureKind::NotFound,
                "not found",
                ToolClassification::Destructive,
            ),
            Timestamp::now(),
        );

        assert!(!record.is_success());
        assert_eq!(record.outcome().payload()["status"], "failed");
    }

    #[test]
    fn serializes_tool_name_as_tool() {
        let record = ToolInvocationRecord::new(
            "call_1",
            "get_pods",
            args(),
            ToolOutcome::success(json!({})),
            Timestamp::now(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tool"], "get_pods");
        assert_eq!(json["arguments"]["namespace"], "kube-system");
        assert_eq!(json["outcome"]["outcome"], "success");
    }
}
