//! HTTP DTOs for read-only cluster endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::agent::tool_arguments::{DEFAULT_EVENT_LIMIT, DEFAULT_TAIL_LINES};

/// Namespace and label selector shared by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub label_selector: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodLogsQuery {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub field_selector: Option<String>,
    #[serde(default = "default_event_limit")]
    pub limit: u32,
}

fn default_tail_lines() -> u32 {
    DEFAULT_TAIL_LINES
}

fn default_event_limit() -> u32 {
    DEFAULT_EVENT_LIMIT
}

#[derive(Debug, Clone, Serialize)]
pub struct PodLogsResponse {
    pub pod_name: String,
    pub namespace: String,
    pub logs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_query_defaults_tail_lines() {
        let query: PodLogsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.tail_lines, DEFAULT_TAIL_LINES);
        assert!(query.namespace.is_none());
    }

    #[test]
    fn events_query_defaults_limit() {
        let query: EventsQuery = serde_json::from_str(r#"{"namespace":"shop"}"#).unwrap();
        assert_eq!(query.limit, DEFAULT_EVENT_LIMIT);
        assert_eq!(query.namespace.as_deref(), Some("shop"));
    }
}
