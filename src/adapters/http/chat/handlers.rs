//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::{
    AnalyzePodsCommand, AnalyzePodsHandler, SendMessageCommand, SendMessageHandler,
};

use super::dto::{AnalyzePodsQuery, AnalyzePodsResponse, ChatRequest, ChatResponse};

#[derive(Clone)]
pub struct ChatHandlers {
    send_message: Arc<SendMessageHandler>,
    analyze_pods: Arc<AnalyzePodsHandler>,
    default_namespace: String,
}

impl ChatHandlers {
    pub fn new(
        send_message: Arc<SendMessageHandler>,
        analyze_pods: Arc<AnalyzePodsHandler>,
        default_namespace: impl Into<String>,
    ) -> Self {
        Self {
            send_message,
            analyze_pods,
            default_namespace: default_namespace.into(),
        }
    }
}

/// POST /v1/chat/message - Run one conversational turn
pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let cmd = SendMessageCommand {
        message: req.message,
        namespace: req.namespace,
        history: req.conversation_history,
    };

    let response = handlers.send_message.handle(cmd).await?;
    Ok(Json(response.into()))
}

/// POST /v1/chat/analyze-pods - Check a namespace and explain any problems
pub async fn analyze_pods(
    State(handlers): State<ChatHandlers>,
    Query(query): Query<AnalyzePodsQuery>,
) -> Result<Json<AnalyzePodsResponse>, ApiError> {
    let namespace = query
        .namespace
        .filter(|ns| !ns.trim().is_empty())
        .unwrap_or_else(|| handlers.default_namespace.clone());

    let cmd = AnalyzePodsCommand {
        namespace: namespace.clone(),
        label_selector: query.label_selector.filter(|s| !s.trim().is_empty()),
    };

    let result = handlers.analyze_pods.handle(cmd).await?;
    Ok(Json(AnalyzePodsResponse::from_result(&namespace, result)))
}
