//! HTTP error mapping shared by every router.
//!
//! Application and port errors convert into [`ApiError`], which renders as
//! a status code plus an [`ErrorResponse`] body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{AgentError, AnalyzePodsError, SendMessageError};
use crate::domain::foundation::ValidationError;
use crate::ports::{ClusterError, DocumentSearchError};

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("UPSTREAM_ERROR", message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new("TIMEOUT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    /// A collaborator (reasoning engine, cluster, index) failed
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            Self::NotFound { resource, id } => ErrorResponse::not_found(resource, id),
            Self::Forbidden(msg) => ErrorResponse::forbidden(msg.clone()),
            Self::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            Self::Upstream(msg) => ErrorResponse::bad_gateway(msg.clone()),
            Self::Timeout(msg) => ErrorResponse::gateway_timeout(msg.clone()),
            Self::Internal(msg) => ErrorResponse::internal(msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

impl From<SendMessageError> for ApiError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::EmptyMessage => Self::BadRequest(err.to_string()),
            SendMessageError::Agent(agent) => agent.into(),
        }
    }
}

impl From<AnalyzePodsError> for ApiError {
    fn from(err: AnalyzePodsError) -> Self {
        match err {
            AnalyzePodsError::Cluster(cluster) => cluster.into(),
            AnalyzePodsError::Timeout { .. } => Self::Timeout(err.to_string()),
            AnalyzePodsError::Agent(agent) => agent.into(),
        }
    }
}

impl From<ClusterError> for ApiError {
    fn from(err: ClusterError) -> Self {
        match err {
            ClusterError::NotFound(msg) => Self::NotFound {
                resource: "Resource",
                id: msg,
            },
            ClusterError::Forbidden(msg) => Self::Forbidden(msg),
            ClusterError::Api { status: 400 | 422, message } => Self::BadRequest(message),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<DocumentSearchError> for ApiError {
    fn from(err: DocumentSearchError) -> Self {
        match err {
            DocumentSearchError::InvalidQuery(_) => Self::BadRequest(err.to_string()),
            DocumentSearchError::DuplicateId(_) => Self::Conflict(err.to_string()),
            DocumentSearchError::Embedding(_)
            | DocumentSearchError::Io(_)
            | DocumentSearchError::Storage(_) => {
                Self::Upstream(err.to_string())
            }
        }
    }
}
