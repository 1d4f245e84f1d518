//! HTTP routes for runbook index endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    clear, delete_document, get_document, index_directory, index_document, search, stats,
    DocumentHandlers,
};

/// Creates the documents router. Mounted at `/v1/docs`.
pub fn document_routes(handlers: DocumentHandlers) -> Router {
    Router::new()
        .route("/index", post(index_document))
        .route("/index-directory", post(index_directory))
        .route("/search", post(search))
        .route("/stats", get(stats))
        .route("/clear", post(clear))
        .route("/:id", get(get_document).delete(delete_document))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::documents::InMemoryDocumentIndex;
    use crate::ports::DocumentIndex;

    fn router(index: &InMemoryDocumentIndex) -> Router {
        document_routes(DocumentHandlers::new(
            Arc::new(index.clone()),
            vec![".md".to_string()],
        ))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn index_then_search() {
        let index = InMemoryDocumentIndex::new("runbooks");

        let response = router(&index)
            .oneshot(post_json(
                "/index",
                json!({"content": "OOMKilled pods need a higher memory limit", "metadata": {"team": "sre"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["id"], "doc_1");

        let response = router(&index)
            .oneshot(post_json("/search", json!({"query": "memory limit"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["id"], "doc_1");
        assert_eq!(json["query"], "memory limit");
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let index = InMemoryDocumentIndex::new("runbooks");

        let response = router(&index)
            .oneshot(post_json("/search", json!({"query": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn too_many_results_requested_is_rejected() {
        let index = InMemoryDocumentIndex::new("runbooks");

        let response = router(&index)
            .oneshot(post_json("/search", json!({"query": "disk", "n_results": 500})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_and_delete_document() {
        let index = InMemoryDocumentIndex::new("runbooks");
        index
            .index("drain the node".to_string(), Default::default(), Some("node-drain".to_string()))
            .await
            .unwrap();

        let response = router(&index).oneshot(request("GET", "/node-drain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["content"], "drain the node");

        let response = router(&index).oneshot(request("DELETE", "/node-drain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(&index).oneshot(request("GET", "/node-drain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router(&index).oneshot(request("DELETE", "/node-drain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let index = InMemoryDocumentIndex::new("runbooks");
        let body = json!({"content": "rotate certs", "id": "certs"});

        let first = router(&index).oneshot(post_json("/index", body.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = router(&index).oneshot(post_json("/index", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn stats_and_clear() {
        let index = InMemoryDocumentIndex::new("runbooks");
        index
            .index("scale the deployment".to_string(), Default::default(), None)
            .await
            .unwrap();

        let response = router(&index).oneshot(request("GET", "/stats")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["collection_name"], "runbooks");
        assert_eq!(json["document_count"], 1);

        let response = router(&index).oneshot(request("POST", "/clear")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(index.stats().await.unwrap().document_count, 0);
    }

    #[tokio::test]
    async fn index_directory_uses_configured_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("oom.md"), "# OOM\nRaise the memory limit").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let index = InMemoryDocumentIndex::new("runbooks");

        let response = router(&index)
            .oneshot(post_json(
                "/index-directory",
                json!({"directory": dir.path().to_string_lossy()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["indexed"], 1);
    }
}
