//! Kubernetes REST client - implementation of ClusterAccessor over the API server.
//!
//! Talks to the API server directly with `reqwest`. Inside a cluster the
//! service-account token and CA bundle are picked up from their mounted
//! paths; outside, load a kubeconfig with
//! [`KubernetesConfig::from_kubeconfig`] or point `api_url` at
//! `kubectl proxy` and leave the token unset.

use async_trait::async_trait;
use reqwest::{Certificate, Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use super::wire::{self, ApiStatus, ObjectList};
use crate::domain::cluster::{
    ClusterInfo, ClusterVersion, DeleteOutcome, DeploymentList, EventList, NamespaceList, PodList,
    ResourceKind, ServiceList,
};
use crate::ports::{ClusterAccessor, ClusterError};

/// Service-account token mounted into every pod.
pub const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Service-account CA bundle mounted into every pod.
pub const SERVICE_ACCOUNT_CA_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Connection settings for the API server.
#[derive(Debug, Clone)]
pub struct KubernetesConfig {
    pub api_url: String,
    /// Static bearer token; takes precedence over `token_path`
    pub(super) token: Option<Secret<String>>,
    /// File holding a bearer token, re-read on every request
    pub token_path: Option<PathBuf>,
    pub ca_cert_path: Option<PathBuf>,
    /// Inline CA bundle; takes precedence over `ca_cert_path`
    pub ca_cert_pem: Option<Vec<u8>>,
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

impl KubernetesConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            token_path: None,
            ca_cert_path: None,
            ca_cert_pem: None,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Settings for running inside a pod.
    pub fn in_cluster() -> Self {
        Self::new("https://kubernetes.default.svc")
            .with_token_path(SERVICE_ACCOUNT_TOKEN_PATH)
            .with_ca_cert_path(SERVICE_ACCOUNT_CA_PATH)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    pub fn with_ca_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }

    pub fn with_ca_cert_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_cert_pem = Some(pem.into());
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`ClusterAccessor`] backed by the Kubernetes REST API.
pub struct KubernetesClient {
    config: KubernetesConfig,
    client: Client,
}

impl KubernetesClient {
    pub fn new(config: KubernetesConfig) -> Result<Self, ClusterError> {
        let mut builder = Client::builder().timeout(config.timeout);

        let pem = match (&config.ca_cert_pem, config.ca_cert_path.as_ref().filter(|p| p.exists())) {
            (Some(pem), _) => Some(pem.clone()),
            (None, Some(path)) => Some(std::fs::read(path).map_err(|e| {
                ClusterError::Configuration(format!("cannot read CA cert {}: {}", path.display(), e))
            })?),
            (None, None) => None,
        };
        if let Some(pem) = pem {
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| ClusterError::Configuration(format!("invalid CA cert: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for the Kubernetes API");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ClusterError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn bearer_token(&self) -> Option<String> {
        if let Some(token) = &self.config.token {
            return Some(token.expose_secret().clone());
        }
        let path = self.config.token_path.as_ref()?;
        match tokio::fs::read_to_string(path).await {
            Ok(token) => Some(token.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No service account token");
                None
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClusterError> {
        let request = match self.bearer_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClusterError::Transport(format!(
                    "request timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else {
                ClusterError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClusterError> {
        let response = self.send(self.client.get(self.url(path)).query(query)).await?;
        response
            .json()
            .await
            .map_err(|e| ClusterError::Decode(e.to_string()))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ClusterError> {
        let list: ObjectList<T> = self.get_json(path, query).await?;
        Ok(list.items)
    }

    async fn version(&self) -> ClusterVersion {
        match self.get_json::<wire::VersionInfo>("/version", &[]).await {
            Ok(version) => version.into(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get cluster version");
                ClusterVersion::unknown()
            }
        }
    }
}

/// Maps a failed API response onto a [`ClusterError`].
///
/// The message comes from the `Status` body when there is one.
fn status_error(status: u16, body: &str) -> ClusterError {
    let message = serde_json::from_str::<ApiStatus>(body)
        .ok()
        .and_then(|s| s.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        404 => ClusterError::NotFound(message),
        401 | 403 => ClusterError::Forbidden(message),
        _ => ClusterError::api(status, message),
    }
}

/// API group prefix and plural resource name for a deletable kind.
fn resource_path(kind: ResourceKind) -> (&'static str, &'static str) {
    match kind {
        ResourceKind::Pod => ("/api/v1", "pods"),
        ResourceKind::Service => ("/api/v1", "services"),
        ResourceKind::ConfigMap => ("/api/v1", "configmaps"),
        ResourceKind::Secret => ("/api/v1", "secrets"),
        ResourceKind::Deployment => ("/apis/apps/v1", "deployments"),
        ResourceKind::StatefulSet => ("/apis/apps/v1", "statefulsets"),
        ResourceKind::DaemonSet => ("/apis/apps/v1", "daemonsets"),
    }
}

fn optional_param<'a>(query: &mut Vec<(&'a str, String)>, key: &'a str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

#[async_trait]
impl ClusterAccessor for KubernetesClient {
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<PodList, ClusterError> {
        let mut query = Vec::new();
        optional_param(&mut query, "labelSelector", label_selector);

        let pods: Vec<wire::Pod> = self
            .list(&format!("/api/v1/namespaces/{}/pods", namespace), &query)
            .await?;
        let list = PodList::new(pods.into_iter().map(Into::into).collect());

        tracing::info!(namespace, count = list.count, label_selector, "Retrieved pods");
        Ok(list)
    }

    async fn get_pod_logs(
        &self,
        pod_name: &str,
        namespace: &str,
        container: Option<&str>,
        tail_lines: u32,
    ) -> Result<String, ClusterError> {
        let mut query = vec![("tailLines", tail_lines.to_string())];
        optional_param(&mut query, "container", container);

        let path = format!("/api/v1/namespaces/{}/pods/{}/log", namespace, pod_name);
        let response = self.send(self.client.get(self.url(&path)).query(&query)).await?;
        let logs = response
            .text()
            .await
            .map_err(|e| ClusterError::Decode(e.to_string()))?;

        tracing::info!(pod = pod_name, namespace, container, "Retrieved pod logs");
        Ok(logs)
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<DeploymentList, ClusterError> {
        let mut query = Vec::new();
        optional_param(&mut query, "labelSelector", label_selector);

        let items: Vec<wire::Deployment> = self
            .list(&format!("/apis/apps/v1/namespaces/{}/deployments", namespace), &query)
            .await?;
        let list = DeploymentList::new(items.into_iter().map(Into::into).collect());

        tracing::info!(namespace, count = list.count, label_selector, "Retrieved deployments");
        Ok(list)
    }

    async fn list_services(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<ServiceList, ClusterError> {
        let mut query = Vec::new();
        optional_param(&mut query, "labelSelector", label_selector);

        let items: Vec<wire::Service> = self
            .list(&format!("/api/v1/namespaces/{}/services", namespace), &query)
            .await?;
        let list = ServiceList::new(items.into_iter().map(Into::into).collect());

        tracing::info!(namespace, count = list.count, label_selector, "Retrieved services");
        Ok(list)
    }

    async fn list_events(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
        limit: u32,
    ) -> Result<EventList, ClusterError> {
        let mut query = vec![("limit", limit.to_string())];
        optional_param(&mut query, "fieldSelector", field_selector);

        let items: Vec<wire::Event> = self
            .list(&format!("/api/v1/namespaces/{}/events", namespace), &query)
            .await?;
        let list = EventList::most_recent_first(items.into_iter().map(Into::into).collect());

        tracing::info!(namespace, count = list.count, field_selector, "Retrieved events");
        Ok(list)
    }

    async fn list_namespaces(&self) -> Result<NamespaceList, ClusterError> {
        let items: Vec<wire::Namespace> = self.list("/api/v1/namespaces", &[]).await?;
        let list = NamespaceList::new(items.into_iter().map(Into::into).collect());

        tracing::info!(count = list.count, "Retrieved namespaces");
        Ok(list)
    }

    async fn get_cluster_info(&self) -> Result<ClusterInfo, ClusterError> {
        let nodes: Vec<wire::Node> = self.list("/api/v1/nodes", &[]).await?;
        let version = self.version().await;
        let info = ClusterInfo::new(nodes.into_iter().map(Into::into).collect(), version);

        tracing::info!(node_count = info.node_count, "Retrieved cluster info");
        Ok(info)
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
        grace_period_seconds: Option<i64>,
    ) -> Result<DeleteOutcome, ClusterError> {
        let (prefix, plural) = resource_path(kind);
        let path = format!("{}/namespaces/{}/{}/{}", prefix, namespace, plural, name);

        let mut request = self.client.request(Method::DELETE, self.url(&path));
        if let Some(grace) = grace_period_seconds.filter(|_| kind.supports_grace_period()) {
            request = request.json(&json!({
                "apiVersion": "v1",
                "kind": "DeleteOptions",
                "gracePeriodSeconds": grace,
            }));
        }
        self.send(request).await?;

        tracing::warn!(kind = %kind, name, namespace, "Deleted resource");
        Ok(DeleteOutcome::deleted(kind, name, namespace))
    }
}
