//! Tool Dispatcher - executes tool calls with failure isolation.
//!
//! Every call the engine requests produces exactly one
//! [`ToolInvocationRecord`]. Unknown tools, invalid arguments, collaborator
//! errors and timeouts all become failed outcomes; nothing is thrown past
//! the dispatcher.

use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::agent::{
    ToolArguments, ToolCall, ToolClassification, ToolFailureKind, ToolInvocationRecord, ToolName,
    ToolOutcome, ToolRegistry, UnknownToolError,
};
use crate::domain::foundation::Timestamp;

use super::{DependencyContext, ToolExecutionError};

/// Resolves tool calls against a registry and a per-turn context.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    tool_timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, tool_timeout: Duration) -> Self {
        Self {
            registry,
            tool_timeout,
        }
    }

    /// The tools this dispatcher will execute.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatches sibling calls concurrently.
    ///
    /// Records come back in the order of `calls`, whatever order the
    /// calls finish in.
    pub async fn dispatch_all(
        &self,
        calls: &[ToolCall],
        ctx: &DependencyContext,
    ) -> Vec<ToolInvocationRecord> {
        join_all(calls.iter().map(|call| self.dispatch(call, ctx))).await
    }

    /// Dispatches one call and records its outcome.
    pub async fn dispatch(&self, call: &ToolCall, ctx: &DependencyContext) -> ToolInvocationRecord {
        let invoked_at = Timestamp::now();
        let raw = call.normalized_arguments();

        let tool = match self.resolve(call.name()) {
            Ok(tool) => tool,
            Err(err) => {
                tracing::warn!(tool = call.name(), error = %err, "Rejected tool call");
                let outcome = ToolOutcome::failure(err.kind(), err.to_string(), ToolClassification::Read);
                return ToolInvocationRecord::new(call.id(), call.name(), raw, outcome, invoked_at);
            }
        };
        let classification = tool.classification();

        let args = match ToolArguments::parse(tool, &raw, ctx.default_namespace()) {
            Ok(args) => args,
            Err(err) => {
                let err = ToolExecutionError::from(err);
                tracing::warn!(tool = %tool, error = %err, "Tool arguments failed validation");
                let outcome = ToolOutcome::failure(err.kind(), err.to_string(), classification);
                return ToolInvocationRecord::new(call.id(), call.name(), raw, outcome, invoked_at);
            }
        };

        let namespace = args.namespace().unwrap_or("-");
        let outcome = match tokio::time::timeout(self.tool_timeout, execute(&args, ctx)).await {
            Ok(Ok(payload)) => {
                tracing::info!(tool = %tool, namespace, "Tool call succeeded");
                ToolOutcome::success(payload)
            }
            Ok(Err(err)) => {
                tracing::warn!(tool = %tool, namespace, error = %err, "Tool call failed");
                ToolOutcome::failure(err.kind(), err.to_string(), classification)
            }
            Err(_) => {
                let err = ToolExecutionError::Timeout {
                    timeout_secs: self.tool_timeout.as_secs(),
                };
                tracing::warn!(tool = %tool, namespace, error = %err, "Tool call timed out");
                ToolOutcome::failure(err.kind(), err.to_string(), classification)
            }
        };

        ToolInvocationRecord::new(call.id(), call.name(), args.to_map(), outcome, invoked_at)
    }

    /// Records a call that will not be executed.
    pub fn reject(&self, call: &ToolCall, kind: ToolFailureKind, message: &str) -> ToolInvocationRecord {
        let classification = call
            .name()
            .parse::<ToolName>()
            .map(|tool| tool.classification())
            .unwrap_or(ToolClassification::Read);
        let outcome = ToolOutcome::failure(kind, message, classification);
        ToolInvocationRecord::new(
            call.id(),
            call.name(),
            call.normalized_arguments(),
            outcome,
            Timestamp::now(),
        )
    }

    fn resolve(&self, name: &str) -> Result<ToolName, ToolExecutionError> {
        let tool: ToolName = name.parse()?;
        if !self.registry.has_tool(tool) {
            return Err(UnknownToolError(name.to_string()).into());
        }
        Ok(tool)
    }
}

/// Runs the collaborator operation behind a validated call.
async fn execute(args: &ToolArguments, ctx: &DependencyContext) -> Result<Value, ToolExecutionError> {
    let cluster = ctx.cluster();

    let payload = match args {
        ToolArguments::GetNamespaces => serde_json::to_value(cluster.list_namespaces().await?)?,
        ToolArguments::GetPods(a) => serde_json::to_value(
            cluster
                .list_pods(&a.namespace, a.label_selector.as_deref())
                .await?,
        )?,
        ToolArguments::GetPodLogs(a) => {
            let logs = cluster
                .get_pod_logs(&a.pod_name, &a.namespace, a.container.as_deref(), a.tail_lines)
                .await?;
            json!({ "logs": logs, "pod_name": a.pod_name })
        }
        ToolArguments::GetDeployments(a) => serde_json::to_value(
            cluster
                .list_deployments(&a.namespace, a.label_selector.as_deref())
                .await?,
        )?,
        ToolArguments::GetServices(a) => serde_json::to_value(
            cluster
                .list_services(&a.namespace, a.label_selector.as_deref())
                .await?,
        )?,
        ToolArguments::GetEvents(a) => serde_json::to_value(
            cluster
                .list_events(&a.namespace, a.field_selector.as_deref(), a.limit)
                .await?,
        )?,
        ToolArguments::GetClusterInfo => serde_json::to_value(cluster.get_cluster_info().await?)?,
        ToolArguments::SearchRunbooks(a) => {
            let results = ctx
                .documents()
                .search(&a.query, a.n_results as usize, None)
                .await?;
            json!({ "results": results, "query": a.query })
        }
        ToolArguments::Delete(a) => serde_json::to_value(
            cluster
                .delete(a.kind, &a.name, &a.namespace, a.grace_period_seconds)
                .await?,
        )?,
    };

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::documents::InMemoryDocumentIndex;
    use crate::adapters::kubernetes::{ClusterOperation, MockClusterAccessor};
    use crate::domain::agent::TOOL_CATALOG;
    use crate::domain::cluster::{PodSummary, ResourceKind};
    use crate::ports::ClusterError;

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(Arc::new(TOOL_CATALOG.clone()), Duration::from_secs(5))
    }

    fn context(cluster: MockClusterAccessor) -> DependencyContext {
        DependencyContext::new(
            Arc::new(cluster),
            Arc::new(InMemoryDocumentIndex::new("runbooks")),
            "default",
        )
    }

    fn running_pod(name: &str, namespace: &str) -> PodSummary {
        PodSummary {
            name: name.to_string(),
            namespace: namespace.to_string(),
            status: "Running".to_string(),
            conditions: vec![],
            containers: vec![],
            node: Some("node-1".to_string()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn get_pods_uses_requested_namespace() {
        let cluster = MockClusterAccessor::new().with_pods(vec![running_pod("coredns", "kube-system")]);
        let ctx = context(cluster.clone());

        let call = ToolCall::new("c1", "get_pods", json!({"namespace": "kube-system"}));
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert!(record.is_success());
        assert_eq!(record.arguments()["namespace"], "kube-system");
        assert_eq!(record.outcome().payload()["count"], 1);
        assert_eq!(
            cluster.calls()[0].namespace.as_deref(),
            Some("kube-system")
        );
    }

    #[tokio::test]
    async fn missing_namespace_uses_context_default() {
        let cluster = MockClusterAccessor::new();
        let ctx = DependencyContext::new(
            Arc::new(cluster.clone()),
            Arc::new(InMemoryDocumentIndex::new("runbooks")),
            "payments",
        );

        let record = dispatcher()
            .dispatch(&ToolCall::new("c1", "get_services", json!("{}")), &ctx)
            .await;

        assert_eq!(record.arguments()["namespace"], "payments");
        assert_eq!(cluster.calls()[0].namespace.as_deref(), Some("payments"));
    }

    #[tokio::test]
    async fn read_failure_becomes_error_payload() {
        let cluster = MockClusterAccessor::new().failing(
            ClusterOperation::ListEvents,
            ClusterError::Transport("connection refused".to_string()),
        );
        let ctx = context(cluster);

        let record = dispatcher()
            .dispatch(&ToolCall::new("c1", "get_events", json!({})), &ctx)
            .await;

        let payload = record.outcome().payload();
        assert!(payload.get("error").is_some());
        assert!(payload.get("status").is_none());
    }

    #[tokio::test]
    async fn deleting_missing_pod_is_marked_failed() {
        let ctx = context(MockClusterAccessor::new());

        let call = ToolCall::new("c1", "delete_pod", json!({"pod_name": "ghost", "namespace": "shop"}));
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert!(!record.is_success());
        let payload = record.outcome().payload();
        assert_eq!(payload["status"], "failed");
        assert!(payload["error"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn delete_existing_resource_returns_status_payload() {
        let cluster = MockClusterAccessor::new().with_resource(ResourceKind::Deployment, "shop", "api");
        let ctx = context(cluster);

        let call = ToolCall::new(
            "c1",
            "delete_deployment",
            json!({"deployment_name": "api", "namespace": "shop"}),
        );
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert_eq!(
            record.outcome().payload(),
            json!({"status": "deleted", "kind": "deployment", "name": "api", "namespace": "shop"})
        );
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_cluster() {
        let cluster = MockClusterAccessor::new();
        let ctx = context(cluster.clone());

        let call = ToolCall::new("c1", "get_pod_logs", json!({"tail_lines": 10}));
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert!(matches!(
            record.outcome(),
            ToolOutcome::Failure { kind: ToolFailureKind::ValidationError, .. }
        ));
        assert!(cluster.calls().is_empty());
        assert_eq!(record.arguments()["tail_lines"], 10);
    }

    #[tokio::test]
    async fn unknown_tool_is_recorded() {
        let ctx = context(MockClusterAccessor::new());

        let call = ToolCall::new("c1", "reboot_node", json!({"node": "n1"}));
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert_eq!(record.tool_name(), "reboot_node");
        assert_eq!(
            record.outcome().payload(),
            json!({"error": "Unknown tool: reboot_node"})
        );
    }

    #[tokio::test]
    async fn tool_outside_registry_is_unknown() {
        let mut registry = ToolRegistry::new();
        registry.register(TOOL_CATALOG.get_tool(ToolName::GetPods).unwrap().clone());
        let dispatcher = ToolDispatcher::new(Arc::new(registry), Duration::from_secs(5));
        let cluster = MockClusterAccessor::new();
        let ctx = context(cluster.clone());

        let call = ToolCall::new("c1", "delete_pod", json!({"pod_name": "web-1"}));
        let record = dispatcher.dispatch(&call, &ctx).await;

        assert!(matches!(
            record.outcome(),
            ToolOutcome::Failure { kind: ToolFailureKind::UnknownTool, .. }
        ));
        assert!(cluster.calls().is_empty());
    }

    #[tokio::test]
    async fn slow_collaborator_times_out() {
        let cluster = MockClusterAccessor::new().with_delay(Duration::from_millis(200));
        let ctx = context(cluster);
        let dispatcher = ToolDispatcher::new(Arc::new(TOOL_CATALOG.clone()), Duration::from_millis(20));

        let record = dispatcher
            .dispatch(&ToolCall::new("c1", "get_namespaces", json!({})), &ctx)
            .await;

        assert!(matches!(
            record.outcome(),
            ToolOutcome::Failure { kind: ToolFailureKind::Timeout, .. }
        ));
    }

    #[tokio::test]
    async fn search_on_empty_index_returns_empty_results() {
        let ctx = context(MockClusterAccessor::new());

        let call = ToolCall::new(
            "c1",
            "search_runbooks",
            json!({"query": "pod crashloop", "n_results": 3}),
        );
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert!(record.is_success());
        assert_eq!(
            record.outcome().payload(),
            json!({"results": [], "query": "pod crashloop"})
        );
    }

    #[tokio::test]
    async fn pod_logs_payload_names_the_pod() {
        let cluster = MockClusterAccessor::new().with_pod_logs("default", "web-1", "boot\nready");
        let ctx = context(cluster);

        let call = ToolCall::new("c1", "get_pod_logs", json!({"pod_name": "web-1"}));
        let record = dispatcher().dispatch(&call, &ctx).await;

        assert_eq!(
            record.outcome().payload(),
            json!({"logs": "boot\nready", "pod_name": "web-1"})
        );
        assert_eq!(record.arguments()["tail_lines"], 100);
    }

    #[tokio::test]
    async fn dispatch_all_preserves_request_order() {
        let cluster = MockClusterAccessor::new();
        let ctx = context(cluster);

        let calls = vec![
            ToolCall::new("a", "get_namespaces", json!({})),
            ToolCall::new("b", "delete_secret", json!({"secret_name": "x"})),
            ToolCall::new("c", "get_pods", json!({})),
        ];
        let records = dispatcher().dispatch_all(&calls, &ctx).await;

        let ids: Vec<_> = records.iter().map(|r| r.call_id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!records[1].is_success());
    }

    #[test]
    fn reject_keeps_destructive_classification() {
        let call = ToolCall::new("c9", "delete_pod", json!({"pod_name": "web-1"}));
        let record = dispatcher().reject(&call, ToolFailureKind::RoundLimitReached, "not executed");

        assert_eq!(
            record.outcome().payload(),
            json!({"error": "not executed", "status": "failed"})
        );
        assert_eq!(record.arguments()["pod_name"], "web-1");
    }
}
