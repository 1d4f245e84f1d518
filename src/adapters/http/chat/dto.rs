//! HTTP DTOs for chat endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::AnalyzePodsResult;
use crate::domain::agent::{AgentResponse, ConversationMessage, ToolInvocationRecord, UsageCounter};
use crate::domain::analysis::Issue;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to send a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Default namespace for the turn; the configured default when absent
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
}

/// Query parameters for proactive analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzePodsQuery {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub label_selector: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One tool call made during a turn.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResponse {
    pub tool: String,
    pub arguments: Map<String, Value>,
    pub result: Value,
    pub success: bool,
    pub duration_ms: u32,
}

impl From<&ToolInvocationRecord> for ToolCallResponse {
    fn from(record: &ToolInvocationRecord) -> Self {
        Self {
            tool: record.tool_name().to_string(),
            arguments: record.arguments().clone(),
            result: record.outcome().payload(),
            success: record.is_success(),
            duration_ms: record.duration_ms(),
        }
    }
}

fn tool_calls(records: &[ToolInvocationRecord]) -> Vec<ToolCallResponse> {
    records.iter().map(ToolCallResponse::from).collect()
}

/// Response for a chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub tool_calls: Vec<ToolCallResponse>,
    pub model: String,
    /// `null` when the engine reported no usage
    pub usage: Option<UsageCounter>,
}

impl From<AgentResponse> for ChatResponse {
    fn from(response: AgentResponse) -> Self {
        Self {
            tool_calls: tool_calls(&response.tool_calls),
            response: response.response,
            model: response.model,
            usage: response.usage,
        }
    }
}

/// Response for proactive analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzePodsResponse {
    Healthy {
        message: String,
        pods_checked: usize,
    },
    IssuesFound {
        namespace: String,
        issues: Vec<Issue>,
        analysis: String,
        tool_calls: Vec<ToolCallResponse>,
    },
}

impl AnalyzePodsResponse {
    pub fn from_result(namespace: &str, result: AnalyzePodsResult) -> Self {
        match result {
            AnalyzePodsResult::Healthy {
                message,
                pods_checked,
            } => Self::Healthy {
                message,
                pods_checked,
            },
            AnalyzePodsResult::IssuesFound {
                issues,
                analysis,
                tool_calls: records,
            } => Self::IssuesFound {
                namespace: namespace.to_string(),
                issues,
                analysis,
                tool_calls: tool_calls(&records),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::ToolOutcome;
    use crate::domain::foundation::Timestamp;
    use serde_json::json;

    #[test]
    fn chat_request_defaults_optional_fields() {
        let req: ChatRequest = serde_json::from_value(json!({"message": "why is web down?"})).unwrap();
        assert_eq!(req.message, "why is web down?");
        assert!(req.namespace.is_none());
        assert!(req.conversation_history.is_empty());
    }

    #[test]
    fn chat_request_accepts_history() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "and now?",
            "namespace": "shop",
            "conversation_history": [
                {"role": "user", "content": "list pods"},
                {"role": "assistant", "content": "3 pods running"}
            ]
        }))
        .unwrap();
        assert_eq!(req.conversation_history.len(), 2);
        assert_eq!(req.namespace.as_deref(), Some("shop"));
    }

    #[test]
    fn chat_response_serializes_absent_usage_as_null() {
        let mut args = Map::new();
        args.insert("namespace".to_string(), json!("shop"));
        let record = ToolInvocationRecord::new(
            "call_1",
            "get_pods",
            args,
            ToolOutcome::success(json!({"count": 0})),
            Timestamp::now(),
        );
        let response = ChatResponse::from(AgentResponse {
            response: "No pods.".to_string(),
            tool_calls: vec![record],
            model: "gpt-4-turbo-preview".to_string(),
            usage: None,
        });

        let json = serde_json::to_value(response).unwrap();
        assert!(json["usage"].is_null());
        assert_eq!(json["tool_calls"][0]["tool"], "get_pods");
        assert_eq!(json["tool_calls"][0]["arguments"]["namespace"], "shop");
        assert_eq!(json["tool_calls"][0]["success"], true);
        assert_eq!(json["tool_calls"][0]["result"]["count"], 0);
    }

    #[test]
    fn healthy_analysis_is_tagged() {
        let response = AnalyzePodsResponse::from_result(
            "shop",
            AnalyzePodsResult::Healthy {
                message: "All pods in namespace 'shop' appear healthy".to_string(),
                pods_checked: 4,
            },
        );
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["pods_checked"], 4);
    }
}
