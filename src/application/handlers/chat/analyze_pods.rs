//! AnalyzePodsHandler - proactive health check of a namespace.
//!
//! Pods are fetched straight from the cluster. Only when the detection rules
//! find something is the reasoning engine asked to explain it.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::application::agent::{AgentError, AgentLoop, DependencyContext};
use crate::domain::agent::{ConversationContextBuilder, ToolInvocationRecord};
use crate::domain::analysis::{analysis_prompt, detect_issues, Issue};
use crate::ports::{ClusterAccessor, ClusterError, DocumentSearch};

/// Which pods to check.
#[derive(Debug, Clone)]
pub struct AnalyzePodsCommand {
    pub namespace: String,
    pub label_selector: Option<String>,
}

/// Outcome of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzePodsResult {
    Healthy {
        message: String,
        pods_checked: usize,
    },
    IssuesFound {
        issues: Vec<Issue>,
        analysis: String,
        tool_calls: Vec<ToolInvocationRecord>,
    },
}

impl AnalyzePodsResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

#[derive(Debug, Error)]
pub enum AnalyzePodsError {
    #[error("could not list pods: {0}")]
    Cluster(#[from] ClusterError),

    #[error("listing pods timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub struct AnalyzePodsHandler {
    cluster: Arc<dyn ClusterAccessor>,
    documents: Arc<dyn DocumentSearch>,
    agent: AgentLoop,
    context: ConversationContextBuilder,
    cluster_timeout: Duration,
}

impl AnalyzePodsHandler {
    pub fn new(
        cluster: Arc<dyn ClusterAccessor>,
        documents: Arc<dyn DocumentSearch>,
        agent: AgentLoop,
        cluster_timeout: Duration,
    ) -> Self {
        Self {
            cluster,
            documents,
            agent,
            context: ConversationContextBuilder::default(),
            cluster_timeout,
        }
    }

    pub fn with_context_builder(mut self, context: ConversationContextBuilder) -> Self {
        self.context = context;
        self
    }

    pub async fn handle(&self, cmd: AnalyzePodsCommand) -> Result<AnalyzePodsResult, AnalyzePodsError> {
        let namespace = cmd.namespace.as_str();

        let pods = tokio::time::timeout(
            self.cluster_timeout,
            self.cluster.list_pods(namespace, cmd.label_selector.as_deref()),
        )
        .await
        .map_err(|_| AnalyzePodsError::Timeout {
            timeout_secs: self.cluster_timeout.as_secs(),
        })??;

        let issues = detect_issues(&pods.pods);
        let pods_checked = pods.pods.len();
        tracing::info!(
            namespace,
            pods_checked,
            issues = issues.len(),
            "Pod analysis complete"
        );

        if issues.is_empty() {
            return Ok(AnalyzePodsResult::Healthy {
                message: format!("All pods in namespace '{}' appear healthy", namespace),
                pods_checked,
            });
        }

        // Same prompt framing as a chat turn with no history
        let prompt = self.context.build(&[], &analysis_prompt(&issues, namespace), namespace);
        let ctx = DependencyContext::new(self.cluster.clone(), self.documents.clone(), namespace);
        let response = self.agent.run(&prompt, &ctx).await?;

        Ok(AnalyzePodsResult::IssuesFound {
            issues,
            analysis: response.response,
            tool_calls: response.tool_calls,
        })
    }
}
