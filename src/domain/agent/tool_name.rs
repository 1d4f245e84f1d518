//! Closed set of tool names known to the agent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ToolClassification;

/// Every tool the reasoning engine may request.
///
/// Dispatch matches on this enum; an engine-supplied name that does not
/// parse into one of these variants is recorded as an unknown tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetNamespaces,
    GetPods,
    GetPodLogs,
    GetDeployments,
    GetServices,
    GetEvents,
    GetClusterInfo,
    SearchRunbooks,
    DeletePod,
    DeleteDeployment,
    DeleteService,
    #[serde(rename = "delete_statefulset")]
    DeleteStatefulSet,
    #[serde(rename = "delete_daemonset")]
    DeleteDaemonSet,
    #[serde(rename = "delete_configmap")]
    DeleteConfigMap,
    DeleteSecret,
}

impl ToolName {
    /// All tools in catalogue order.
    pub const ALL: [ToolName; 15] = [
        ToolName::GetNamespaces,
        ToolName::GetPods,
        ToolName::GetPodLogs,
        ToolName::GetDeployments,
        ToolName::GetServices,
        ToolName::GetEvents,
        ToolName::GetClusterInfo,
        ToolName::SearchRunbooks,
        ToolName::DeletePod,
        ToolName::DeleteDeployment,
        ToolName::DeleteService,
        ToolName::DeleteStatefulSet,
        ToolName::DeleteDaemonSet,
        ToolName::DeleteConfigMap,
        ToolName::DeleteSecret,
    ];

    /// Returns the wire name used in tool schemas and engine requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetNamespaces => "get_namespaces",
            Self::GetPods => "get_pods",
            Self::GetPodLogs => "get_pod_logs",
            Self::GetDeployments => "get_deployments",
            Self::GetServices => "get_services",
            Self::GetEvents => "get_events",
            Self::GetClusterInfo => "get_cluster_info",
            Self::SearchRunbooks => "search_runbooks",
            Self::DeletePod => "delete_pod",
            Self::DeleteDeployment => "delete_deployment",
            Self::DeleteService => "delete_service",
            Self::DeleteStatefulSet => "delete_statefulset",
            Self::DeleteDaemonSet => "delete_daemonset",
            Self::DeleteConfigMap => "delete_configmap",
            Self::DeleteSecret => "delete_secret",
        }
    }

    /// Returns whether this tool observes or mutates the cluster.
    pub fn classification(&self) -> ToolClassification {
        match self {
            Self::DeletePod
            | Self::DeleteDeployment
            | Self::DeleteService
            | Self::DeleteStatefulSet
            | Self::DeleteDaemonSet
            | Self::DeleteConfigMap
            | Self::DeleteSecret => ToolClassification::Destructive,
            _ => ToolClassification::Read,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tool name is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownToolError(pub String);

impl FromStr for ToolName {
    type Err = UnknownToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownToolError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_name() {
        for name in ToolName::ALL {
            assert_eq!(name.as_str().parse::<ToolName>().unwrap(), name);
        }
    }

    #[test]
    fn serde_name_matches_wire_name() {
        for name in ToolName::ALL {
            let json = serde_json::to_value(name).unwrap();
            assert_eq!(json, name.as_str());
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "restart_cluster".parse::<ToolName>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: restart_cluster");
    }

    #[test]
    fn deletes_are_destructive_and_reads_are_not() {
        assert!(ToolName::DeleteSecret.classification().is_destructive());
        assert!(ToolName::DeleteConfigMap.classification().is_destructive());
        assert!(!ToolName::GetPods.classification().is_destructive());
        assert!(!ToolName::SearchRunbooks.classification().is_destructive());
    }
}
