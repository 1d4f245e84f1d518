//! Kubeconfig loading for running outside the cluster.
//!
//! Only the current context is read: its cluster's server URL and CA, and
//! its user's bearer token (inline or `tokenFile`). Client-certificate and
//! exec-plugin credentials are not supported.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::client::KubernetesConfig;
use crate::ports::ClusterError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Kubeconfig {
    current_context: Option<String>,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(default)]
    users: Vec<NamedUser>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    name: String,
    cluster: ClusterEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ClusterEntry {
    server: String,
    certificate_authority: Option<PathBuf>,
    certificate_authority_data: Option<String>,
    #[serde(default)]
    insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    context: ContextEntry,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    cluster: String,
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedUser {
    name: String,
    #[serde(default)]
    user: UserEntry,
}

#[derive(Debug, Default, Deserialize)]
struct UserEntry {
    token: Option<String>,
    #[serde(rename = "tokenFile")]
    token_file: Option<PathBuf>,
}

fn invalid(message: impl std::fmt::Display) -> ClusterError {
    ClusterError::Configuration(format!("kubeconfig: {}", message))
}

/// Relative paths in a kubeconfig are relative to the file itself.
fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    }
}

impl KubernetesConfig {
    /// Reads the current context of the kubeconfig at `path`.
    pub fn from_kubeconfig(path: impl AsRef<Path>) -> Result<Self, ClusterError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {}", path.display(), e)))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse_kubeconfig(&raw, base_dir)
    }

    fn parse_kubeconfig(raw: &str, base_dir: &Path) -> Result<Self, ClusterError> {
        let kubeconfig: Kubeconfig = serde_yaml::from_str(raw).map_err(|e| invalid(e))?;

        let context_name = kubeconfig
            .current_context
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| invalid("no current-context set"))?;
        let context = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .ok_or_else(|| invalid(format!("context '{}' not found", context_name)))?;
        let cluster = kubeconfig
            .clusters
            .into_iter()
            .find(|c| c.name == context.context.cluster)
            .ok_or_else(|| invalid(format!("cluster '{}' not found", context.context.cluster)))?
            .cluster;

        let mut config = KubernetesConfig::new(cluster.server)
            .with_accept_invalid_certs(cluster.insecure_skip_tls_verify);

        if let Some(data) = cluster.certificate_authority_data {
            let pem = STANDARD
                .decode(data.trim())
                .map_err(|e| invalid(format!("certificate-authority-data: {}", e)))?;
            config = config.with_ca_cert_pem(pem);
        } else if let Some(ca) = cluster.certificate_authority {
            config = config.with_ca_cert_path(resolve(base_dir, ca));
        }

        let user = context
            .context
            .user
            .as_deref()
            .and_then(|name| kubeconfig.users.into_iter().find(|u| u.name == name))
            .map(|u| u.user)
            .unwrap_or_default();

        if let Some(token) = user.token {
            config = config.with_token(token);
        } else if let Some(file) = user.token_file {
            config = config.with_token_path(resolve(base_dir, file));
        } else {
            tracing::warn!(context = context_name, "Kubeconfig user has no bearer token");
        }

        tracing::debug!(context = context_name, server = %config.api_url, "Loaded kubeconfig");
        Ok(config)
    }
}
