//! Agent Loop - drives one tool-use turn with the reasoning engine.
//!
//! Each round sends the running exchange to the engine. If the engine asks
//! for tools, the calls go through the [`ToolDispatcher`] and their results
//! are appended before the next round. The turn ends on the first response
//! without tool calls. After `max_tool_rounds` tool rounds the engine is
//! asked once more with no tools offered.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::agent::{
    AgentResponse, ToolDefinition, ToolFailureKind, ToolInvocationRecord, UsageAccountant,
    SRE_SYSTEM_PROMPT,
};
use crate::domain::foundation::TurnId;
use crate::ports::{AIProvider, CompletionRequest, CompletionResponse, Message, RequestMetadata};

use super::{AgentError, DependencyContext, ToolDispatcher};

/// Text returned when the engine ends a bounded turn without an answer.
pub const ROUND_LIMIT_FALLBACK: &str =
    "I could not finish the investigation within the allowed number of tool calls. \
     Please narrow the question or try again.";

/// Text returned when the engine answers with nothing before the round limit.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I was not able to produce an answer. Please rephrase the question or try again.";

const ROUND_LIMIT_MESSAGE: &str = "Tool call limit for this turn reached; call was not executed";

/// Tuning for one agent turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentLoopConfig {
    /// Rounds in which tools are offered
    pub max_tool_rounds: u32,
    /// Deadline for each engine call
    pub engine_timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            engine_timeout: Duration::from_secs(90),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Runs turns against a reasoning engine.
#[derive(Clone)]
pub struct AgentLoop {
    provider: Arc<dyn AIProvider>,
    dispatcher: ToolDispatcher,
    config: AgentLoopConfig,
}

impl AgentLoop {
    pub fn new(provider: Arc<dyn AIProvider>, dispatcher: ToolDispatcher, config: AgentLoopConfig) -> Self {
        Self {
            provider,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &AgentLoopConfig {
        &self.config
    }

    /// Runs one turn for `prompt`.
    ///
    /// Tool failures are folded into the records and never fail the turn.
    /// Engine failures and engine timeouts do.
    pub async fn run(&self, prompt: &str, ctx: &DependencyContext) -> Result<AgentResponse, AgentError> {
        let turn_id = TurnId::new();
        let tools: Vec<ToolDefinition> = self
            .dispatcher
            .registry()
            .definitions()
            .into_iter()
            .cloned()
            .collect();

        let mut messages = vec![Message::user(prompt)];
        let mut records: Vec<ToolInvocationRecord> = Vec::new();
        let mut usage = UsageAccountant::new();
        let mut round = 0;

        let (response, model, limit_reached) = loop {
            round += 1;
            let offer_tools = round <= self.config.max_tool_rounds;

            let offered: &[ToolDefinition] = if offer_tools { &tools } else { &[] };
            let request = self.request(turn_id, round, &messages, offered);
            let response = self.complete(request).await?;
            if let Some(reported) = response.usage {
                usage.record(reported.input_tokens, reported.output_tokens);
            }

            if !response.has_tool_calls() {
                break (response.content, response.model, !offer_tools);
            }

            if !offer_tools {
                tracing::warn!(
                    turn_id = %turn_id,
                    requested = response.tool_calls.len(),
                    "Engine requested tools after the round limit"
                );
                records.extend(response.tool_calls.iter().map(|call| {
                    self.dispatcher
                        .reject(call, ToolFailureKind::RoundLimitReached, ROUND_LIMIT_MESSAGE)
                }));
                break (response.content, response.model, true);
            }

            let batch = self.dispatcher.dispatch_all(&response.tool_calls, ctx).await;
            let CompletionResponse {
                content, tool_calls, ..
            } = response;
            messages.push(Message::assistant_tool_calls(content, tool_calls));
            for record in &batch {
                messages.push(Message::tool_result(
                    record.call_id(),
                    record.outcome().payload().to_string(),
                ));
            }
            records.extend(batch);
        };

        let response = match (response.trim().is_empty(), limit_reached) {
            (false, _) => response,
            (true, true) => ROUND_LIMIT_FALLBACK.to_string(),
            (true, false) => EMPTY_RESPONSE_FALLBACK.to_string(),
        };
        let usage = usage.snapshot();

        tracing::info!(
            turn_id = %turn_id,
            rounds = round,
            tool_calls = records.len(),
            failed_tool_calls = records.iter().filter(|r| !r.is_success()).count(),
            input_tokens = usage.map(|u| u.input_tokens),
            output_tokens = usage.map(|u| u.output_tokens),
            "Agent turn completed"
        );

        Ok(AgentResponse {
            response,
            tool_calls: records,
            model,
            usage,
        })
    }

    fn request(
        &self,
        turn_id: TurnId,
        round: u32,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> CompletionRequest {
        let mut request = CompletionRequest::new(RequestMetadata::new(turn_id, round))
            .with_system_prompt(SRE_SYSTEM_PROMPT)
            .with_messages(messages.to_vec())
            .with_tools(tools.to_vec());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AgentError> {
        match tokio::time::timeout(self.config.engine_timeout, self.provider.complete(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AgentError::EngineTimeout {
                timeout_secs: self.config.engine_timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for AgentLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoop")
            .field("provider", &self.provider.provider_info().name)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::documents::InMemoryDocumentIndex;
    use crate::adapters::kubernetes::{ClusterOperation, MockClusterAccessor};
    use crate::domain::agent::{ToolOutcome, TOOL_CATALOG};
    use crate::ports::{ClusterError, MessageRole, TokenUsage};
    use serde_json::json;

    fn context(cluster: MockClusterAccessor) -> DependencyContext {
        DependencyContext::new(
            Arc::new(cluster),
            Arc::new(InMemoryDocumentIndex::new("runbooks")),
            "default",
        )
    }

    fn agent(provider: &MockAIProvider, config: AgentLoopConfig) -> AgentLoop {
        let dispatcher = ToolDispatcher::new(Arc::new(TOOL_CATALOG.clone()), Duration::from_secs(5));
        AgentLoop::new(Arc::new(provider.clone()), dispatcher, config)
    }

    #[tokio::test]
    async fn plain_answer_ends_turn_in_one_round() {
        let provider = MockAIProvider::new().with_response("Everything looks fine.");
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("how is the cluster?", &ctx)
            .await
            .unwrap();

        assert_eq!(response.response, "Everything looks fine.");
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.model, "mock-model-1");
        let usage = response.usage.unwrap();
        assert_eq!(usage.total_tokens, usage.input_tokens + usage.output_tokens);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn request_carries_policy_and_full_tool_set() {
        let provider = MockAIProvider::new().with_response("ok");
        let ctx = context(MockClusterAccessor::new());

        agent(&provider, AgentLoopConfig::default())
            .run("hi", &ctx)
            .await
            .unwrap();

        let request = &provider.get_calls()[0];
        assert_eq!(request.system_prompt.as_deref(), Some(SRE_SYSTEM_PROMPT));
        assert_eq!(request.tools.len(), TOOL_CATALOG.tool_count());
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, "hi");
    }

    #[tokio::test]
    async fn tool_results_are_fed_back_before_next_round() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_pods", json!({"namespace": "kube-system"}))
            .with_response("kube-system has no pods.");
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("list pods in kube-system", &ctx)
            .await
            .unwrap();

        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].tool_name(), "get_pods");
        assert_eq!(response.tool_calls[0].arguments()["namespace"], "kube-system");

        let second = &provider.get_calls()[1];
        let tool_message = second.messages.last().unwrap();
        assert_eq!(tool_message.role, MessageRole::Tool);
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        let payload: serde_json::Value = serde_json::from_str(&tool_message.content).unwrap();
        assert_eq!(payload["count"], 0);
        assert_eq!(second.messages[1].tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn usage_accumulates_across_rounds() {
        let provider = MockAIProvider::new()
            .with_tool_calls_usage(
                vec![("get_namespaces".to_string(), json!({}))],
                Some(TokenUsage::new(100, 7)),
            )
            .with_response_usage("done", Some(TokenUsage::new(150, 30)));
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("namespaces?", &ctx)
            .await
            .unwrap();

        let usage = response.usage.unwrap();
        assert_eq!(usage.input_tokens, 250);
        assert_eq!(usage.output_tokens, 37);
        assert_eq!(usage.total_tokens, 287);
    }

    #[tokio::test]
    async fn missing_usage_is_absent_not_zero() {
        let provider = MockAIProvider::new().with_response_usage("done", None);
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("hi", &ctx)
            .await
            .unwrap();

        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn failing_tool_does_not_fail_turn() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_events", json!({"namespace": "shop"}))
            .with_response("I could not read events.");
        let cluster = MockClusterAccessor::new().failing(
            ClusterOperation::ListEvents,
            ClusterError::Forbidden("events is forbidden".to_string()),
        );
        let ctx = context(cluster);

        let response = agent(&provider, AgentLoopConfig::default())
            .run("why is shop broken?", &ctx)
            .await
            .unwrap();

        assert_eq!(response.failed_tool_calls(), 1);
        assert!(response.tool_calls[0].outcome().payload().get("error").is_some());
        assert_eq!(response.response, "I could not read events.");
    }

    #[tokio::test]
    async fn sibling_calls_recorded_in_requested_order() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![
                ("get_services".to_string(), json!({})),
                ("get_deployments".to_string(), json!({})),
                ("get_namespaces".to_string(), json!({})),
            ])
            .with_response("done");
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("overview", &ctx)
            .await
            .unwrap();

        let names: Vec<_> = response.tool_calls.iter().map(|r| r.tool_name()).collect();
        assert_eq!(names, vec!["get_services", "get_deployments", "get_namespaces"]);
    }

    #[tokio::test]
    async fn round_limit_withholds_tools_and_records_leftover_calls() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_pods", json!({}))
            .with_tool_call("delete_pod", json!({"pod_name": "web-1"}));
        let ctx = context(MockClusterAccessor::new());
        let config = AgentLoopConfig {
            max_tool_rounds: 1,
            ..AgentLoopConfig::default()
        };

        let response = agent(&provider, config).run("fix it", &ctx).await.unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].tools.is_empty());
        assert_eq!(response.tool_calls.len(), 2);
        assert!(matches!(
            response.tool_calls[1].outcome(),
            ToolOutcome::Failure { kind: ToolFailureKind::RoundLimitReached, .. }
        ));
        assert_eq!(response.response, ROUND_LIMIT_FALLBACK);
    }

    #[tokio::test]
    async fn empty_answer_within_limit_is_not_blamed_on_tool_limit() {
        let provider = MockAIProvider::new().with_response("");
        let ctx = context(MockClusterAccessor::new());

        let response = agent(&provider, AgentLoopConfig::default())
            .run("anything wrong?", &ctx)
            .await
            .unwrap();

        assert_eq!(provider.get_calls().len(), 1);
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.response, EMPTY_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn empty_answer_in_forced_final_round_reports_limit() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_pods", json!({}))
            .with_response("  ");
        let ctx = context(MockClusterAccessor::new());
        let config = AgentLoopConfig {
            max_tool_rounds: 1,
            ..AgentLoopConfig::default()
        };

        let response = agent(&provider, config).run("check", &ctx).await.unwrap();

        assert_eq!(provider.get_calls().len(), 2);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.response, ROUND_LIMIT_FALLBACK);
    }

    #[tokio::test]
    async fn engine_error_fails_turn() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let ctx = context(MockClusterAccessor::new());

        let err = agent(&provider, AgentLoopConfig::default())
            .run("hi", &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Engine(_)));
    }

    #[tokio::test]
    async fn slow_engine_times_out() {
        let provider = MockAIProvider::new()
            .with_response("late")
            .with_delay(Duration::from_millis(200));
        let ctx = context(MockClusterAccessor::new());
        let config = AgentLoopConfig {
            engine_timeout: Duration::from_millis(20),
            ..AgentLoopConfig::default()
        };

        let err = agent(&provider, config).run("hi", &ctx).await.unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn configured_sampling_is_forwarded() {
        let provider = MockAIProvider::new().with_response("ok");
        let ctx = context(MockClusterAccessor::new());
        let config = AgentLoopConfig {
            temperature: Some(0.2),
            max_tokens: Some(512),
            ..AgentLoopConfig::default()
        };

        agent(&provider, config).run("hi", &ctx).await.unwrap();

        let request = &provider.get_calls()[0];
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(512));
    }
}
