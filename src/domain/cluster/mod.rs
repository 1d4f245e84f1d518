//! Cluster snapshot types.
//!
//! Plain data returned by the cluster accessor. Field names follow the
//! JSON the reasoning engine sees as tool results.

mod resource_kind;
mod snapshots;

pub use resource_kind::ResourceKind;
pub use snapshots::{
    ClusterInfo, ClusterVersion, ContainerSummary, DeleteOutcome, DeploymentList,
    DeploymentSummary, EventList, EventSummary, InvolvedObject, NamespaceList, NamespaceSummary,
    NodeSummary, PodList, PodSummary, ReplicaCounts, ResourceCondition, ServiceList, ServicePort,
    ServiceSummary,
};
