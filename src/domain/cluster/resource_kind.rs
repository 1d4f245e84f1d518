use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespaced resource kinds the assistant can delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    Deployment,
    Service,
    StatefulSet,
    DaemonSet,
    ConfigMap,
    Secret,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::Service => "service",
            Self::StatefulSet => "statefulset",
            Self::DaemonSet => "daemonset",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
        }
    }

    /// Argument field that carries the resource name in delete tool calls.
    pub fn name_field(&self) -> &'static str {
        match self {
            Self::Pod => "pod_name",
            Self::Deployment => "deployment_name",
            Self::Service => "service_name",
            Self::StatefulSet => "statefulset_name",
            Self::DaemonSet => "daemonset_name",
            Self::ConfigMap => "configmap_name",
            Self::Secret => "secret_name",
        }
    }

    /// Kinds whose deletion terminates running workloads.
    pub fn supports_grace_period(&self) -> bool {
        matches!(
            self,
            Self::Pod | Self::Deployment | Self::StatefulSet | Self::DaemonSet
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_matches_as_str() {
        for kind in [
            ResourceKind::Pod,
            ResourceKind::StatefulSet,
            ResourceKind::DaemonSet,
            ResourceKind::ConfigMap,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn grace_period_only_for_workloads() {
        assert!(ResourceKind::Pod.supports_grace_period());
        assert!(ResourceKind::DaemonSet.supports_grace_period());
        assert!(!ResourceKind::Service.supports_grace_period());
        assert!(!ResourceKind::ConfigMap.supports_grace_period());
        assert!(!ResourceKind::Secret.supports_grace_period());
    }
}
