//! Cluster Accessor Adapters.
//!
//! - `KubernetesClient` - REST client for the Kubernetes API server, configured
//!   in-cluster from the service account or from a kubeconfig file
//! - `MockClusterAccessor` - In-memory cluster for testing

mod client;
mod kubeconfig;
mod mock;
mod wire;

pub use client::{
    KubernetesClient, KubernetesConfig, SERVICE_ACCOUNT_CA_PATH, SERVICE_ACCOUNT_TOKEN_PATH,
};
pub use mock::{ClusterOperation, MockClusterAccessor, RecordedClusterCall};
