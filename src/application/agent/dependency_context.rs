//! Per-turn bundle of collaborator handles.

use std::fmt;
use std::sync::Arc;

use crate::ports::{ClusterAccessor, DocumentSearch};

/// Everything a tool call may touch during one turn.
///
/// Built fresh for each chat or analysis request. The collaborator handles
/// are shared clients; the default namespace belongs to this turn only.
#[derive(Clone)]
pub struct DependencyContext {
    cluster: Arc<dyn ClusterAccessor>,
    documents: Arc<dyn DocumentSearch>,
    default_namespace: String,
}

impl DependencyContext {
    pub fn new(
        cluster: Arc<dyn ClusterAccessor>,
        documents: Arc<dyn DocumentSearch>,
        default_namespace: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            documents,
            default_namespace: default_namespace.into(),
        }
    }

    pub fn cluster(&self) -> &dyn ClusterAccessor {
        self.cluster.as_ref()
    }

    pub fn documents(&self) -> &dyn DocumentSearch {
        self.documents.as_ref()
    }

    /// Namespace used when a tool call does not name one.
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }
}

impl fmt::Debug for DependencyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyContext")
            .field("default_namespace", &self.default_namespace)
            .finish_non_exhaustive()
    }
}
