use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ResourceKind;

/// A status condition on a pod or deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Pods
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub name: String,
    pub image: Option<String>,
    pub ready: bool,
    pub restart_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    /// Pod phase ("Running", "Pending", ...)
    pub status: String,
    pub conditions: Vec<ResourceCondition>,
    pub containers: Vec<ContainerSummary>,
    pub node: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodList {
    pub pods: Vec<PodSummary>,
    pub count: usize,
}

impl PodList {
    pub fn new(pods: Vec<PodSummary>) -> Self {
        let count = pods.len();
        Self { pods, count }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Deployments
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplicaCounts {
    pub desired: Option<u32>,
    pub current: u32,
    pub ready: u32,
    pub updated: u32,
    pub available: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub name: String,
    pub namespace: String,
    pub replicas: ReplicaCounts,
    pub conditions: Vec<ResourceCondition>,
    pub strategy: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentList {
    pub deployments: Vec<DeploymentSummary>,
    pub count: usize,
}

impl DeploymentList {
    pub fn new(deployments: Vec<DeploymentSummary>) -> Self {
        let count = deployments.len();
        Self { deployments, count }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Services
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: Option<String>,
    pub port: i32,
    pub target_port: String,
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub cluster_ip: Option<String>,
    pub external_ips: Vec<String>,
    pub ports: Vec<ServicePort>,
    pub selector: BTreeMap<String, String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceList {
    pub services: Vec<ServiceSummary>,
    pub count: usize,
}

impl ServiceList {
    pub fn new(services: Vec<ServiceSummary>) -> Self {
        let count = services.len();
        Self { services, count }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvolvedObject {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub involved_object: InvolvedObject,
    pub count: Option<i32>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventList {
    pub events: Vec<EventSummary>,
    pub count: usize,
}

impl EventList {
    /// Builds the list sorted by last timestamp, most recent first.
    ///
    /// Events without a last timestamp go to the end, keeping their order.
    pub fn most_recent_first(mut events: Vec<EventSummary>) -> Self {
        events.sort_by(|a, b| b.last_timestamp.cmp(&a.last_timestamp));
        let count = events.len();
        Self { events, count }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Namespaces and cluster
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    pub name: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceList {
    pub namespaces: Vec<NamespaceSummary>,
    pub count: usize,
}

impl NamespaceList {
    pub fn new(namespaces: Vec<NamespaceSummary>) -> Self {
        let count = namespaces.len();
        Self { namespaces, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub name: String,
    /// First condition whose status is "True", or "Unknown"
    pub status: String,
    pub roles: Vec<String>,
    pub version: Option<String>,
    pub os: Option<String>,
    pub kernel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterVersion {
    pub major: String,
    pub minor: String,
    pub git_version: String,
}

impl ClusterVersion {
    /// Placeholder used when the version endpoint cannot be read.
    pub fn unknown() -> Self {
        Self {
            major: "unknown".to_string(),
            minor: "unknown".to_string(),
            git_version: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub nodes: Vec<NodeSummary>,
    pub node_count: usize,
    pub version: ClusterVersion,
}

impl ClusterInfo {
    pub fn new(nodes: Vec<NodeSummary>, version: ClusterVersion) -> Self {
        let node_count = nodes.len();
        Self {
            nodes,
            node_count,
            version,
        }
    }
}

/// Payload returned after a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub status: String,
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
}

impl DeleteOutcome {
    pub fn deleted(kind: ResourceKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            status: "deleted".to_string(),
            kind,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(name: &str, last: Option<DateTime<Utc>>) -> EventSummary {
        EventSummary {
            name: name.to_string(),
            namespace: "default".to_string(),
            event_type: Some("Warning".to_string()),
            reason: Some("BackOff".to_string()),
            message: None,
            involved_object: InvolvedObject {
                kind: Some("Pod".to_string()),
                name: Some("web-1".to_string()),
                namespace: Some("default".to_string()),
            },
            count: Some(1),
            first_timestamp: None,
            last_timestamp: last,
        }
    }

    #[test]
    fn events_sorted_most_recent_first_with_untimed_last() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        let list = EventList::most_recent_first(vec![
            event("old", Some(t1)),
            event("untimed", None),
            event("new", Some(t2)),
        ]);

        let names: Vec<_> = list.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "untimed"]);
        assert_eq!(list.count, 3);
    }

    #[test]
    fn delete_outcome_serializes_status_payload() {
        let outcome = DeleteOutcome::deleted(ResourceKind::Pod, "web-1", "shop");
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "deleted", "kind": "pod", "name": "web-1", "namespace": "shop"})
        );
    }

    #[test]
    fn condition_serializes_type_field() {
        let condition = ResourceCondition {
            condition_type: "Ready".to_string(),
            status: "False".to_string(),
            reason: None,
            message: None,
        };
        let json = serde_json::to_value(condition).unwrap();
        assert_eq!(json["type"], "Ready");
    }
}
