//! Kubernetes API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Kubernetes API server connection
#[derive(Debug, Clone, Deserialize)]
pub struct KubernetesConfig {
    /// API server URL (`http://127.0.0.1:8001` for `kubectl proxy`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Kubeconfig for running outside the cluster; when set, its current
    /// context replaces `api_url`, the token and the CA settings
    pub kubeconfig_path: Option<String>,

    /// Static bearer token
    pub token: Option<String>,

    /// File holding a bearer token, re-read on every request
    #[serde(default = "default_token_path")]
    pub token_path: Option<String>,

    /// CA bundle for the API server certificate
    #[serde(default = "default_ca_cert_path")]
    pub ca_cert_path: Option<String>,

    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Namespace used when a request does not name one
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl KubernetesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Kubernetes configuration
    pub fn validate(&self, is_production: bool) -> Result<(), ValidationError> {
        if self.kubeconfig_path.as_ref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ValidationError::MissingRequired("kubernetes.kubeconfig_path"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("kubernetes.api_url"));
        }
        if self.default_namespace.trim().is_empty() {
            return Err(ValidationError::EmptyNamespace);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("kubernetes.timeout_secs"));
        }
        if is_production && self.accept_invalid_certs {
            return Err(ValidationError::InsecureTlsInProduction);
        }
        Ok(())
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            kubeconfig_path: None,
            token: None,
            token_path: default_token_path(),
            ca_cert_path: default_ca_cert_path(),
            accept_invalid_certs: false,
            default_namespace: default_namespace(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_token_path() -> Option<String> {
    Some("/var/run/secrets/kubernetes.io/serviceaccount/token".to_string())
}

fn default_ca_cert_path() -> Option<String> {
    Some("/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string())
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_timeout() -> u64 {
    30
}
