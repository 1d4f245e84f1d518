//! The static tool catalogue offered to the reasoning engine.
//!
//! Built once on first use and shared read-only by every turn.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::domain::cluster::ResourceKind;

use super::tool_arguments::{
    DEFAULT_EVENT_LIMIT, DEFAULT_SEARCH_RESULTS, DEFAULT_TAIL_LINES, MAX_EVENT_LIMIT,
    MAX_SEARCH_RESULTS, MAX_TAIL_LINES,
};
use super::{ToolClassification, ToolDefinition, ToolName, ToolRegistry};

/// Process-wide tool catalogue.
pub static TOOL_CATALOG: Lazy<ToolRegistry> = Lazy::new(build_catalog);

/// Builds a registry holding every tool in [`ToolName::ALL`].
pub fn build_catalog() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for name in ToolName::ALL {
        registry.register(definition_for(name));
    }
    registry
}

fn definition_for(name: ToolName) -> ToolDefinition {
    match name {
        ToolName::GetNamespaces => get_namespaces_tool(),
        ToolName::GetPods => get_pods_tool(),
        ToolName::GetPodLogs => get_pod_logs_tool(),
        ToolName::GetDeployments => get_deployments_tool(),
        ToolName::GetServices => get_services_tool(),
        ToolName::GetEvents => get_events_tool(),
        ToolName::GetClusterInfo => get_cluster_info_tool(),
        ToolName::SearchRunbooks => search_runbooks_tool(),
        ToolName::DeletePod => delete_tool(name, ResourceKind::Pod),
        ToolName::DeleteDeployment => delete_tool(name, ResourceKind::Deployment),
        ToolName::DeleteService => delete_tool(name, ResourceKind::Service),
        ToolName::DeleteStatefulSet => delete_tool(name, ResourceKind::StatefulSet),
        ToolName::DeleteDaemonSet => delete_tool(name, ResourceKind::DaemonSet),
        ToolName::DeleteConfigMap => delete_tool(name, ResourceKind::ConfigMap),
        ToolName::DeleteSecret => delete_tool(name, ResourceKind::Secret),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shared schema fragments
// ═══════════════════════════════════════════════════════════════════════════

fn namespace_property() -> Value {
    json!({
        "type": "string",
        "description": "The Kubernetes namespace. Defaults to the conversation's current namespace when omitted."
    })
}

fn label_selector_property(what: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("Label selector for filtering {} (e.g., 'app=nginx')", what)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Read tools
// ═══════════════════════════════════════════════════════════════════════════

fn get_namespaces_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetNamespaces,
        "List all namespaces in the cluster with their status and labels.",
        json!({ "type": "object", "properties": {} }),
        ToolClassification::Read,
    )
}

fn get_pods_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetPods,
        "Get information about pods in a Kubernetes namespace: phase, conditions, containers and restart counts.",
        json!({
            "type": "object",
            "properties": {
                "namespace": namespace_property(),
                "label_selector": label_selector_property("pods")
            }
        }),
        ToolClassification::Read,
    )
}

fn get_pod_logs_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetPodLogs,
        "Get logs from a specific pod.",
        json!({
            "type": "object",
            "required": ["pod_name"],
            "properties": {
                "pod_name": { "type": "string", "description": "Name of the pod" },
                "namespace": namespace_property(),
                "container": {
                    "type": "string",
                    "description": "Container name (if pod has multiple containers)"
                },
                "tail_lines": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_TAIL_LINES,
                    "default": DEFAULT_TAIL_LINES,
                    "description": "Number of lines to retrieve from the end of the log"
                }
            }
        }),
        ToolClassification::Read,
    )
}

fn get_deployments_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetDeployments,
        "Get information about deployments in a Kubernetes namespace, including replica counts and conditions.",
        json!({
            "type": "object",
            "properties": {
                "namespace": namespace_property(),
                "label_selector": label_selector_property("deployments")
            }
        }),
        ToolClassification::Read,
    )
}

fn get_services_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetServices,
        "Get information about services in a Kubernetes namespace: type, cluster IP, ports and selector.",
        json!({
            "type": "object",
            "properties": {
                "namespace": namespace_property(),
                "label_selector": label_selector_property("services")
            }
        }),
        ToolClassification::Read,
    )
}

fn get_events_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetEvents,
        "Get recent events in a Kubernetes namespace, most recent first.",
        json!({
            "type": "object",
            "properties": {
                "namespace": namespace_property(),
                "field_selector": {
                    "type": "string",
                    "description": "Field selector for filtering events (e.g., 'involvedObject.name=web-1')"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_EVENT_LIMIT,
                    "default": DEFAULT_EVENT_LIMIT,
                    "description": "Maximum number of events to retrieve"
                }
            }
        }),
        ToolClassification::Read,
    )
}

fn get_cluster_info_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::GetClusterInfo,
        "Get general cluster information: nodes, their readiness and roles, and the Kubernetes version.",
        json!({ "type": "object", "properties": {} }),
        ToolClassification::Read,
    )
}

fn search_runbooks_tool() -> ToolDefinition {
    ToolDefinition::new(
        ToolName::SearchRunbooks,
        "Search runbooks and documentation for relevant troubleshooting information.",
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query for finding relevant documentation"
                },
                "n_results": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_SEARCH_RESULTS,
                    "default": DEFAULT_SEARCH_RESULTS,
                    "description": "Number of results to return"
                }
            }
        }),
        ToolClassification::Read,
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Destructive tools
// ═══════════════════════════════════════════════════════════════════════════

fn delete_tool(name: ToolName, kind: ResourceKind) -> ToolDefinition {
    let mut properties = serde_json::Map::new();
    properties.insert(
        kind.name_field().to_string(),
        json!({
            "type": "string",
            "description": format!("Name of the {} to delete", kind.as_str())
        }),
    );
    properties.insert("namespace".to_string(), namespace_property());
    if kind.supports_grace_period() {
        properties.insert(
            "grace_period_seconds".to_string(),
            json!({
                "type": "integer",
                "minimum": 0,
                "description": format!("Grace period for {} termination in seconds", kind.as_str())
            }),
        );
    }

    ToolDefinition::new(
        name,
        format!(
            "Delete a {} from a Kubernetes namespace. Use with caution - this is a destructive operation that cannot be undone.",
            kind.as_str()
        ),
        json!({
            "type": "object",
            "required": [kind.name_field()],
            "properties": properties
        }),
        ToolClassification::Destructive,
    )
}
