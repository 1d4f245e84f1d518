//! Mock cluster accessor for testing.
//!
//! Holds a fixed cluster snapshot in memory, records every call, and can
//! be told to fail specific operations.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::cluster::{
    ClusterInfo, ClusterVersion, DeleteOutcome, DeploymentList, DeploymentSummary, EventList,
    EventSummary, NamespaceList, NamespaceSummary, PodList, PodSummary, ResourceKind, ServiceList,
    ServiceSummary,
};
use crate::ports::{ClusterAccessor, ClusterError};

/// Cluster operations, used to target failure injection and inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOperation {
    ListPods,
    GetPodLogs,
    ListDeployments,
    ListServices,
    ListEvents,
    ListNamespaces,
    GetClusterInfo,
    Delete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClusterCall {
    pub operation: ClusterOperation,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default)]
struct MockClusterState {
    pods: Vec<PodSummary>,
    deployments: Vec<DeploymentSummary>,
    services: Vec<ServiceSummary>,
    events: Vec<EventSummary>,
    namespaces: Vec<NamespaceSummary>,
    logs: HashMap<(String, String), String>,
    deletable: HashSet<(ResourceKind, String, String)>,
    failures: HashMap<ClusterOperation, ClusterError>,
    calls: Vec<RecordedClusterCall>,
}

/// In-memory [`ClusterAccessor`] for tests.
#[derive(Debug, Clone, Default)]
pub struct MockClusterAccessor {
    state: Arc<Mutex<MockClusterState>>,
    delay: Duration,
}

impl MockClusterAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state(self, f: impl FnOnce(&mut MockClusterState)) -> Self {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut *state);
        }
        self
    }

    pub fn with_pods(self, pods: Vec<PodSummary>) -> Self {
        self.with_state(|s| s.pods.extend(pods))
    }

    pub fn with_deployments(self, deployments: Vec<DeploymentSummary>) -> Self {
        self.with_state(|s| s.deployments.extend(deployments))
    }

    pub fn with_services(self, services: Vec<ServiceSummary>) -> Self {
        self.with_state(|s| s.services.extend(services))
    }

    pub fn with_events(self, events: Vec<EventSummary>) -> Self {
        self.with_state(|s| s.events.extend(events))
    }

    pub fn with_namespaces(self, namespaces: Vec<NamespaceSummary>) -> Self {
        self.with_state(|s| s.namespaces.extend(namespaces))
    }

    pub fn with_pod_logs(
        self,
        namespace: impl Into<String>,
        pod: impl Into<String>,
        logs: impl Into<String>,
    ) -> Self {
        let key = (namespace.into(), pod.into());
        let logs = logs.into();
        self.with_state(|s| {
            s.logs.insert(key, logs);
        })
    }

    /// Registers a resource that delete calls may remove.
    pub fn with_resource(
        self,
        kind: ResourceKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let key = (kind, namespace.into(), name.into());
        self.with_state(|s| {
            s.deletable.insert(key);
        })
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn failing(self, operation: ClusterOperation, error: ClusterError) -> Self {
        self.with_state(|s| {
            s.failures.insert(operation, error);
        })
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<RecordedClusterCall> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }

    /// Number of calls made to `operation`.
    pub fn call_count(&self, operation: ClusterOperation) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    async fn enter(
        &self,
        operation: ClusterOperation,
        namespace: Option<&str>,
        name: Option<&str>,
    ) -> Result<(), ClusterError> {
        let failure = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.calls.push(RecordedClusterCall {
                operation,
                namespace: namespace.map(str::to_string),
                name: name.map(str::to_string),
            });
            state.failures.get(&operation).cloned()
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&MockClusterState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }
}

#[async_trait]
impl ClusterAccessor for MockClusterAccessor {
    async fn list_pods(
        &self,
        namespace: &str,
        _label_selector: Option<&str>,
    ) -> Result<PodList, ClusterError> {
        self.enter(ClusterOperation::ListPods, Some(namespace), None)
            .await?;
        Ok(PodList::new(self.read(|s| {
            s.pods
                .iter()
                .filter(|p| p.namespace == namespace)
                .cloned()
                .collect()
        })))
    }

    async fn get_pod_logs(
        &self,
        pod_name: &str,
        namespace: &str,
        _container: Option<&str>,
        tail_lines: u32,
    ) -> Result<String, ClusterError> {
        self.enter(ClusterOperation::GetPodLogs, Some(namespace), Some(pod_name))
            .await?;
        let logs = self.read(|s| {
            s.logs
                .get(&(namespace.to_string(), pod_name.to_string()))
                .cloned()
        });
        match logs {
            Some(logs) => {
                let lines: Vec<&str> = logs.lines().collect();
                let start = lines.len().saturating_sub(tail_lines as usize);
                Ok(lines[start..].join("\n"))
            }
            None => Err(ClusterError::NotFound(format!(
                "pods \"{}\" not found",
                pod_name
            ))),
        }
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        _label_selector: Option<&str>,
    ) -> Result<DeploymentList, ClusterError> {
        self.enter(ClusterOperation::ListDeployments, Some(namespace), None)
            .await?;
        Ok(DeploymentList::new(self.read(|s| {
            s.deployments
                .iter()
                .filter(|d| d.namespace == namespace)
                .cloned()
                .collect()
        })))
    }

    async fn list_services(
        &self,
        namespace: &str,
        _label_selector: Option<&str>,
    ) -> Result<ServiceList, ClusterError> {
        self.enter(ClusterOperation::ListServices, Some(namespace), None)
            .await?;
        Ok(ServiceList::new(self.read(|s| {
            s.services
                .iter()
                .filter(|svc| svc.namespace == namespace)
                .cloned()
                .collect()
        })))
    }

    async fn list_events(
        &self,
        namespace: &str,
        _field_selector: Option<&str>,
        limit: u32,
    ) -> Result<EventList, ClusterError> {
        self.enter(ClusterOperation::ListEvents, Some(namespace), None)
            .await?;
        let events = self.read(|s| {
            s.events
                .iter()
                .filter(|e| e.namespace == namespace)
                .take(limit as usize)
                .cloned()
                .collect()
        });
        Ok(EventList::most_recent_first(events))
    }

    async fn list_namespaces(&self) -> Result<NamespaceList, ClusterError> {
        self.enter(ClusterOperation::ListNamespaces, None, None)
            .await?;
        Ok(NamespaceList::new(self.read(|s| s.namespaces.clone())))
    }

    async fn get_cluster_info(&self) -> Result<ClusterInfo, ClusterError> {
        self.enter(ClusterOperation::GetClusterInfo, None, None)
            .await?;
        Ok(ClusterInfo::new(Vec::new(), ClusterVersion::unknown()))
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
        _grace_period_seconds: Option<i64>,
    ) -> Result<DeleteOutcome, ClusterError> {
        self.enter(ClusterOperation::Delete, Some(namespace), Some(name))
            .await?;
        let removed = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .deletable
            .remove(&(kind, namespace.to_string(), name.to_string()));

        if removed {
            Ok(DeleteOutcome::deleted(kind, name, namespace))
        } else {
            Err(ClusterError::NotFound(format!(
                "{}s \"{}\" not found",
                kind, name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_removes_registered_resource_once() {
        let cluster = MockClusterAccessor::new().with_resource(ResourceKind::Pod, "shop", "web-1");

        let outcome = cluster
            .delete(ResourceKind::Pod, "web-1", "shop", None)
            .await
            .unwrap();
        assert_eq!(outcome.status, "deleted");

        let again = cluster.delete(ResourceKind::Pod, "web-1", "shop", None).await;
        assert!(matches!(again, Err(ClusterError::NotFound(_))));
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_call_recorded() {
        let cluster = MockClusterAccessor::new().failing(
            ClusterOperation::ListPods,
            ClusterError::Transport("connection refused".to_string()),
        );

        let result = cluster.list_pods("default", None).await;
        assert!(matches!(result, Err(ClusterError::Transport(_))));
        assert_eq!(cluster.call_count(ClusterOperation::ListPods), 1);
    }

    #[tokio::test]
    async fn logs_are_tailed() {
        let cluster =
            MockClusterAccessor::new().with_pod_logs("default", "web-1", "one\ntwo\nthree");

        let logs = cluster
            .get_pod_logs("web-1", "default", None, 2)
            .await
            .unwrap();
        assert_eq!(logs, "two\nthree");
    }
}
