//! HTTP routes for chat endpoints.

use axum::{routing::post, Router};

use super::handlers::{analyze_pods, send_message, ChatHandlers};

/// Creates the chat router. Mounted at `/v1/chat`.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/message", post(send_message))
        .route("/analyze-pods", post(analyze_pods))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::documents::InMemoryDocumentIndex;
    use crate::adapters::kubernetes::MockClusterAccessor;
    use crate::application::{
        AgentLoop, AgentLoopConfig, AnalyzePodsHandler, SendMessageHandler, ToolDispatcher,
    };
    use crate::domain::agent::{ConversationContextBuilder, TOOL_CATALOG};
    use crate::domain::cluster::{ContainerSummary, PodSummary};

    fn pod(name: &str, phase: &str, restarts: u32) -> PodSummary {
        PodSummary {
            name: name.to_string(),
            namespace: "default".to_string(),
            status: phase.to_string(),
            conditions: vec![],
            containers: vec![ContainerSummary {
                name: "app".to_string(),
                image: None,
                ready: phase == "Running",
                restart_count: restarts,
            }],
            node: None,
            created_at: None,
        }
    }

    fn router(provider: MockAIProvider, cluster: MockClusterAccessor) -> Router {
        let cluster = Arc::new(cluster);
        let documents = Arc::new(InMemoryDocumentIndex::new("runbooks"));
        let dispatcher = ToolDispatcher::new(Arc::new(TOOL_CATALOG.clone()), Duration::from_secs(5));
        let agent = AgentLoop::new(Arc::new(provider), dispatcher, AgentLoopConfig::default());

        let send = SendMessageHandler::new(
            cluster.clone(),
            documents.clone(),
            ConversationContextBuilder::default(),
            agent.clone(),
            "default",
        );
        let analyze = AnalyzePodsHandler::new(cluster, documents, agent, Duration::from_secs(5));

        chat_routes(ChatHandlers::new(Arc::new(send), Arc::new(analyze), "default"))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn message_returns_answer_and_tool_calls() {
        let provider = MockAIProvider::new()
            .with_tool_call("get_pods", json!({"namespace": "default"}))
            .with_response("All 1 pods are running.");
        let cluster = MockClusterAccessor::new().with_pods(vec![pod("web-1", "Running", 0)]);

        let response = router(provider, cluster)
            .oneshot(post_json("/message", json!({"message": "how are my pods?"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["response"], "All 1 pods are running.");
        assert_eq!(json["tool_calls"][0]["tool"], "get_pods");
        assert_eq!(json["tool_calls"][0]["success"], true);
    }

    #[tokio::test]
    async fn history_entries_without_role_are_accepted() {
        let response = router(MockAIProvider::new().with_response("Yes."), MockClusterAccessor::new())
            .oneshot(post_json(
                "/message",
                json!({
                    "message": "still broken?",
                    "conversation_history": [{"content": "web-1 was crashing"}]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], "Yes.");
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let response = router(MockAIProvider::new(), MockClusterAccessor::new())
            .oneshot(post_json("/message", json!({"message": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn engine_failure_is_bad_gateway() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);

        let response = router(provider, MockClusterAccessor::new())
            .oneshot(post_json("/message", json!({"message": "hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn analyze_pods_healthy_namespace() {
        let cluster = MockClusterAccessor::new().with_pods(vec![pod("web-1", "Running", 1)]);

        let response = router(MockAIProvider::new(), cluster)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze-pods?namespace=default")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["pods_checked"], 1);
    }

    #[tokio::test]
    async fn analyze_pods_reports_issues() {
        let provider = MockAIProvider::new().with_response("web-1 is stuck pending.");
        let cluster = MockClusterAccessor::new().with_pods(vec![pod("web-1", "Pending", 0)]);

        let response = router(provider, cluster)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze-pods")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "issues_found");
        assert_eq!(json["namespace"], "default");
        assert_eq!(json["issues"][0]["pod"], "web-1");
        assert_eq!(json["analysis"], "web-1 is stuck pending.");
    }
}
