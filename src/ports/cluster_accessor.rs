//! Cluster Accessor Port - Interface to the Kubernetes API.
//!
//! Returns structured snapshots of namespaced resources and performs
//! deletes. Every method is an I/O boundary; callers bound them with
//! timeouts.

use async_trait::async_trait;

use crate::domain::cluster::{
    ClusterInfo, DeleteOutcome, DeploymentList, EventList, NamespaceList, PodList, ResourceKind,
    ServiceList,
};

/// Port for reading and mutating cluster state.
#[async_trait]
pub trait ClusterAccessor: Send + Sync {
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<PodList, ClusterError>;

    /// Returns the last `tail_lines` lines of a container's log.
    async fn get_pod_logs(
        &self,
        pod_name: &str,
        namespace: &str,
        container: Option<&str>,
        tail_lines: u32,
    ) -> Result<String, ClusterError>;

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<DeploymentList, ClusterError>;

    async fn list_services(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<ServiceList, ClusterError>;

    /// Lists events, most recent first.
    async fn list_events(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
        limit: u32,
    ) -> Result<EventList, ClusterError>;

    async fn list_namespaces(&self) -> Result<NamespaceList, ClusterError>;

    async fn get_cluster_info(&self) -> Result<ClusterInfo, ClusterError>;

    /// Deletes one namespaced resource.
    ///
    /// `grace_period_seconds` is ignored for kinds without termination semantics.
    async fn delete(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
        grace_period_seconds: Option<i64>,
    ) -> Result<DeleteOutcome, ClusterError>;
}

/// Cluster accessor errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    /// The resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service account may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The API server rejected the request.
    #[error("kubernetes API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Could not reach the API server.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API server answered with something we could not read.
    #[error("decode error: {0}")]
    Decode(String),

    /// Client misconfiguration (bad URL, unreadable credentials).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClusterError {
    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_error_displays_correctly() {
        let err = ClusterError::NotFound("pods \"ghost\" not found".to_string());
        assert_eq!(err.to_string(), "not found: pods \"ghost\" not found");

        let err = ClusterError::api(422, "invalid selector");
        assert_eq!(
            err.to_string(),
            "kubernetes API error (422): invalid selector"
        );
    }

    #[test]
    fn retryable_classification() {
        assert!(ClusterError::Transport("reset".to_string()).is_retryable());
        assert!(ClusterError::api(503, "unavailable").is_retryable());
        assert!(ClusterError::api(429, "slow down").is_retryable());
        assert!(!ClusterError::api(400, "bad").is_retryable());
        assert!(!ClusterError::Forbidden("no".to_string()).is_retryable());
    }
}
