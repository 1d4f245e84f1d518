//! Kubernetes API object shapes and their conversion into snapshots.
//!
//! Only the fields the assistant reads are modelled. Everything else in the
//! API response is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::cluster::{
    ClusterVersion, ContainerSummary, DeploymentSummary, EventSummary, InvolvedObject,
    NamespaceSummary, NodeSummary, PodSummary, ReplicaCounts, ResourceCondition, ServicePort,
    ServiceSummary,
};

const NODE_ROLE_LABEL: &str = "node-role.kubernetes.io";

#[derive(Debug, Deserialize)]
pub struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    pub namespace: Option<String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// `Status` body returned with API errors.
#[derive(Debug, Default, Deserialize)]
pub struct ApiStatus {
    pub message: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl From<Condition> for ResourceCondition {
    fn from(c: Condition) -> Self {
        Self {
            condition_type: c.condition_type,
            status: c.status,
            reason: c.reason,
            message: c.message,
        }
    }
}

fn conditions(list: Vec<Condition>) -> Vec<ResourceCondition> {
    list.into_iter().map(ResourceCondition::from).collect()
}

// ----- Pods -----

#[derive(Debug, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
    pub node_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Container {
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    pub phase: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub container_statuses: Vec<ContainerStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    pub name: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub restart_count: u32,
}

impl From<Pod> for PodSummary {
    fn from(pod: Pod) -> Self {
        let statuses = pod.status.container_statuses;
        let containers = pod
            .spec
            .containers
            .into_iter()
            .map(|c| {
                let status = statuses.iter().find(|s| s.name == c.name);
                ContainerSummary {
                    ready: status.map(|s| s.ready).unwrap_or(false),
                    restart_count: status.map(|s| s.restart_count).unwrap_or(0),
                    name: c.name,
                    image: c.image,
                }
            })
            .collect();

        Self {
            name: pod.metadata.name,
            namespace: pod.metadata.namespace.unwrap_or_default(),
            status: pod.status.phase.unwrap_or_else(|| "Unknown".to_string()),
            conditions: conditions(pod.status.conditions),
            containers,
            node: pod.spec.node_name,
            created_at: pod.metadata.creation_timestamp,
        }
    }
}

// ----- Deployments -----

#[derive(Debug, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DeploymentSpec,
    #[serde(default)]
    pub status: DeploymentStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeploymentSpec {
    pub replicas: Option<u32>,
    pub strategy: Option<DeploymentStrategy>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentStrategy {
    #[serde(rename = "type")]
    pub strategy_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    pub replicas: Option<u32>,
    pub ready_replicas: Option<u32>,
    pub updated_replicas: Option<u32>,
    pub available_replicas: Option<u32>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl From<Deployment> for DeploymentSummary {
    fn from(d: Deployment) -> Self {
        Self {
            name: d.metadata.name,
            namespace: d.metadata.namespace.unwrap_or_default(),
            replicas: ReplicaCounts {
                desired: d.spec.replicas,
                current: d.status.replicas.unwrap_or(0),
                ready: d.status.ready_replicas.unwrap_or(0),
                updated: d.status.updated_replicas.unwrap_or(0),
                available: d.status.available_replicas.unwrap_or(0),
            },
            conditions: conditions(d.status.conditions),
            strategy: d.spec.strategy.and_then(|s| s.strategy_type),
            created_at: d.metadata.creation_timestamp,
        }
    }
}

// ----- Services -----

#[derive(Debug, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "externalIPs", default)]
    pub external_ips: Vec<String>,
    #[serde(default)]
    pub ports: Vec<ServicePortSpec>,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortSpec {
    pub name: Option<String>,
    pub port: i32,
    /// Either a port number or a named container port
    pub target_port: Option<Value>,
    pub protocol: Option<String>,
}

impl From<ServicePortSpec> for ServicePort {
    fn from(p: ServicePortSpec) -> Self {
        // An unset targetPort defaults to the service port
        let target_port = match p.target_port {
            Some(Value::String(name)) => name,
            Some(Value::Number(n)) => n.to_string(),
            _ => p.port.to_string(),
        };
        Self {
            name: p.name,
            port: p.port,
            target_port,
            protocol: p.protocol,
        }
    }
}

impl From<Service> for ServiceSummary {
    fn from(s: Service) -> Self {
        Self {
            name: s.metadata.name,
            namespace: s.metadata.namespace.unwrap_or_default(),
            service_type: s.spec.service_type,
            cluster_ip: s.spec.cluster_ip,
            external_ips: s.spec.external_ips,
            ports: s.spec.ports.into_iter().map(ServicePort::from).collect(),
            selector: s.spec.selector,
            created_at: s.metadata.creation_timestamp,
        }
    }
}

// ----- Events -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub involved_object: ObjectReference,
    pub count: Option<i32>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectReference {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl From<Event> for EventSummary {
    fn from(e: Event) -> Self {
        Self {
            name: e.metadata.name,
            namespace: e.metadata.namespace.unwrap_or_default(),
            event_type: e.event_type,
            reason: e.reason,
            message: e.message,
            involved_object: InvolvedObject {
                kind: e.involved_object.kind,
                name: e.involved_object.name,
                namespace: e.involved_object.namespace,
            },
            count: e.count,
            first_timestamp: e.first_timestamp,
            last_timestamp: e.last_timestamp,
        }
    }
}

// ----- Namespaces, nodes, version -----

#[derive(Debug, Deserialize)]
pub struct Namespace {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub status: Option<NamespaceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct NamespaceStatus {
    pub phase: Option<String>,
}

impl From<Namespace> for NamespaceSummary {
    fn from(ns: Namespace) -> Self {
        Self {
            name: ns.metadata.name,
            status: ns.status.and_then(|s| s.phase),
            created_at: ns.metadata.creation_timestamp,
            labels: ns.metadata.labels,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: NodeStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub node_info: NodeSystemInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSystemInfo {
    pub kubelet_version: Option<String>,
    pub os_image: Option<String>,
    pub kernel_version: Option<String>,
}

impl From<Node> for NodeSummary {
    fn from(node: Node) -> Self {
        let status = node
            .status
            .conditions
            .iter()
            .find(|c| c.status == "True")
            .map(|c| c.condition_type.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let roles: BTreeSet<String> = node
            .metadata
            .labels
            .keys()
            .filter(|label| label.contains(NODE_ROLE_LABEL))
            .filter_map(|label| label.split('/').nth(1))
            .map(str::to_string)
            .collect();

        Self {
            name: node.metadata.name,
            status,
            roles: roles.into_iter().collect(),
            version: node.status.node_info.kubelet_version,
            os: node.status.node_info.os_image,
            kernel: node.status.node_info.kernel_version,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
    #[serde(default)]
    pub git_version: String,
}

impl From<VersionInfo> for ClusterVersion {
    fn from(v: VersionInfo) -> Self {
        Self {
            major: v.major,
            minor: v.minor,
            git_version: v.git_version,
        }
    }
}
