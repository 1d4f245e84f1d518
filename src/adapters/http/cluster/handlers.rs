//! HTTP handlers for read-only cluster endpoints.
//!
//! These call the cluster accessor directly, bypassing the agent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::domain::agent::tool_arguments::{MAX_EVENT_LIMIT, MAX_TAIL_LINES};
use crate::domain::cluster::{ClusterInfo, DeploymentList, EventList, NamespaceList, PodList, ServiceList};
use crate::domain::foundation::ValidationError;
use crate::ports::{ClusterAccessor, ClusterError};

use super::dto::{EventsQuery, ListQuery, PodLogsQuery, PodLogsResponse};

#[derive(Clone)]
pub struct ClusterHandlers {
    cluster: Arc<dyn ClusterAccessor>,
    default_namespace: String,
    timeout: Duration,
}

impl ClusterHandlers {
    pub fn new(
        cluster: Arc<dyn ClusterAccessor>,
        default_namespace: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            cluster,
            default_namespace: default_namespace.into(),
            timeout,
        }
    }

    fn namespace(&self, requested: Option<String>) -> String {
        requested
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or_else(|| self.default_namespace.clone())
    }

    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, ClusterError>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::Timeout(format!(
                "Kubernetes API did not respond within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

fn check_range(field: &str, value: u32, max: u32) -> Result<(), ValidationError> {
    if value == 0 || value > max {
        return Err(ValidationError::out_of_range(field, 1, max as i64, value as i64));
    }
    Ok(())
}

/// GET /v1/k8s/namespaces
pub async fn list_namespaces(
    State(handlers): State<ClusterHandlers>,
) -> Result<Json<NamespaceList>, ApiError> {
    let namespaces = handlers.call(handlers.cluster.list_namespaces()).await?;
    Ok(Json(namespaces))
}

/// GET /v1/k8s/cluster-info
pub async fn cluster_info(
    State(handlers): State<ClusterHandlers>,
) -> Result<Json<ClusterInfo>, ApiError> {
    let info = handlers.call(handlers.cluster.get_cluster_info()).await?;
    Ok(Json(info))
}

/// GET /v1/k8s/pods
pub async fn list_pods(
    State(handlers): State<ClusterHandlers>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PodList>, ApiError> {
    let namespace = handlers.namespace(query.namespace);
    let pods = handlers
        .call(handlers.cluster.list_pods(&namespace, query.label_selector.as_deref()))
        .await?;
    Ok(Json(pods))
}

/// GET /v1/k8s/pods/:pod/logs
pub async fn pod_logs(
    State(handlers): State<ClusterHandlers>,
    Path(pod_name): Path<String>,
    Query(query): Query<PodLogsQuery>,
) -> Result<Json<PodLogsResponse>, ApiError> {
    check_range("tail_lines", query.tail_lines, MAX_TAIL_LINES)?;
    let namespace = handlers.namespace(query.namespace);

    let logs = handlers
        .call(handlers.cluster.get_pod_logs(
            &pod_name,
            &namespace,
            query.container.as_deref(),
            query.tail_lines,
        ))
        .await?;

    Ok(Json(PodLogsResponse {
        pod_name,
        namespace,
        logs,
    }))
}

/// GET /v1/k8s/deployments
pub async fn list_deployments(
    State(handlers): State<ClusterHandlers>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DeploymentList>, ApiError> {
    let namespace = handlers.namespace(query.namespace);
    let deployments = handlers
        .call(handlers.cluster.list_deployments(&namespace, query.label_selector.as_deref()))
        .await?;
    Ok(Json(deployments))
}

/// GET /v1/k8s/services
pub async fn list_services(
    State(handlers): State<ClusterHandlers>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ServiceList>, ApiError> {
    let namespace = handlers.namespace(query.namespace);
    let services = handlers
        .call(handlers.cluster.list_services(&namespace, query.label_selector.as_deref()))
        .await?;
    Ok(Json(services))
}

/// GET /v1/k8s/events
pub async fn list_events(
    State(handlers): State<ClusterHandlers>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventList>, ApiError> {
    check_range("limit", query.limit, MAX_EVENT_LIMIT)?;
    let namespace = handlers.namespace(query.namespace);
    let events = handlers
        .call(handlers.cluster.list_events(
            &namespace,
            query.field_selector.as_deref(),
            query.limit,
        ))
        .await?;
    Ok(Json(events))
}
