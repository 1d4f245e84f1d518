//! Mock AI Provider for testing.
//!
//! Provides a scripted implementation of the AIProvider port, allowing
//! agent turns to run without calling a real model.
//!
//! # Features
//!
//! - Queued responses: final text or tool-call requests
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_tool_call("get_pods", json!({"namespace": "kube-system"}))
//!     .with_response("Two pods are running in kube-system.");
//!
//! let response = provider.complete(request).await?;
//! assert!(response.has_tool_calls());
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::agent::ToolCall;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    next_call_id: Arc<Mutex<u32>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return final text.
    Text {
        content: String,
        usage: Option<TokenUsage>,
    },
    /// Request tool calls.
    ToolCalls {
        calls: Vec<(String, Value)>,
        usage: Option<TokenUsage>,
    },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 128000),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            next_call_id: Arc::new(Mutex::new(0)),
        }
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
        self
    }

    /// Queues a final text response with default usage.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_response_usage(content, Some(TokenUsage::new(10, 20)))
    }

    /// Queues a final text response with explicit usage (or none).
    pub fn with_response_usage(self, content: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        self.push(MockResponse::Text {
            content: content.into(),
            usage,
        })
    }

    /// Queues a round requesting a single tool call.
    pub fn with_tool_call(self, name: impl Into<String>, arguments: Value) -> Self {
        self.with_tool_calls(vec![(name.into(), arguments)])
    }

    /// Queues a round requesting several tool calls at once.
    pub fn with_tool_calls(self, calls: Vec<(String, Value)>) -> Self {
        self.with_tool_calls_usage(calls, Some(TokenUsage::new(15, 5)))
    }

    /// Queues a tool-call round with explicit usage (or none).
    pub fn with_tool_calls_usage(self, calls: Vec<(String, Value)>, usage: Option<TokenUsage>) -> Self {
        self.push(MockResponse::ToolCalls { calls, usage })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text {
                content: "Mock response".to_string(),
                usage: Some(TokenUsage::new(5, 10)),
            })
    }

    fn call_id(&self) -> String {
        let mut next = self
            .next_call_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *next += 1;
        format!("call_{}", *next)
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text { content, usage } => Ok(CompletionResponse {
                content,
                tool_calls: Vec::new(),
                usage,
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::ToolCalls { calls, usage } => {
                let tool_calls = calls
                    .into_iter()
                    .map(|(name, args)| ToolCall::new(self.call_id(), name, args))
                    .collect();
                Ok(CompletionResponse {
                    content: String::new(),
                    tool_calls,
                    usage,
                    model: self.info.model.clone(),
                    finish_reason: FinishReason::ToolCalls,
                })
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TurnId;
    use crate::ports::RequestMetadata;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(TurnId::new(), 1))
    }

    #[tokio::test]
    async fn returns_default_response_when_queue_empty() {
        let provider = MockAIProvider::new();
        let response = provider.complete(request()).await.unwrap();

        assert_eq!(response.content, "Mock response");
        assert_eq!(response.model, "mock-model-1");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_pods", json!({"namespace": "kube-system"}))
            .with_response("done");

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.finish_reason, FinishReason::ToolCalls);
        assert_eq!(first.tool_calls[0].name(), "get_pods");
        assert_eq!(first.tool_calls[0].id(), "call_1");

        let second = provider.complete(request()).await.unwrap();
        assert_eq!(second.content, "done");
    }

    #[tokio::test]
    async fn tool_call_ids_are_unique_within_a_round() {
        let provider = MockAIProvider::new().with_tool_calls(vec![
            ("get_pods".to_string(), json!({})),
            ("get_events".to_string(), json!({})),
        ]);

        let response = provider.complete(request()).await.unwrap();
        assert_ne!(response.tool_calls[0].id(), response.tool_calls[1].id());
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let result = provider.complete(request()).await;
        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn tracks_calls() {
        let provider = MockAIProvider::new();
        provider.complete(request()).await.unwrap();
        provider.complete(request()).await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(50));
        let start = std::time::Instant::now();
        provider.complete(request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
