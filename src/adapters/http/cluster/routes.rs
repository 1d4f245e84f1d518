//! HTTP routes for cluster endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    cluster_info, list_deployments, list_events, list_namespaces, list_pods, list_services,
    pod_logs, ClusterHandlers,
};

/// Creates the cluster router. Mounted at `/v1/k8s`.
pub fn cluster_routes(handlers: ClusterHandlers) -> Router {
    Router::new()
        .route("/namespaces", get(list_namespaces))
        .route("/cluster-info", get(cluster_info))
        .route("/pods", get(list_pods))
        .route("/pods/:pod/logs", get(pod_logs))
        .route("/deployments", get(list_deployments))
        .route("/services", get(list_services))
        .route("/events", get(list_events))
        .with_state(handlers)
}
