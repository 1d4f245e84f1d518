//! HTTP handlers for runbook index endpoints.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::domain::agent::tool_arguments::MAX_SEARCH_RESULTS;
use crate::domain::foundation::ValidationError;
use crate::ports::{CollectionStats, DocumentIndex, DocumentSearch, IndexedDocument};

use super::dto::{
    DocumentCommandResponse, IndexDirectoryRequest, IndexDirectoryResponse, IndexDocumentRequest,
    SearchRequest, SearchResponse, StatusResponse,
};

#[derive(Clone)]
pub struct DocumentHandlers {
    index: Arc<dyn DocumentIndex>,
    file_extensions: Vec<String>,
}

impl DocumentHandlers {
    pub fn new(index: Arc<dyn DocumentIndex>, file_extensions: Vec<String>) -> Self {
        Self {
            index,
            file_extensions,
        }
    }
}

/// POST /v1/docs/index
pub async fn index_document(
    State(handlers): State<DocumentHandlers>,
    Json(req): Json<IndexDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentCommandResponse>), ApiError> {
    if req.content.trim().is_empty() {
        return Err(ValidationError::empty_field("content").into());
    }

    let id = handlers.index.index(req.content, req.metadata, req.id).await?;
    tracing::info!(document_id = %id, "Document indexed");

    Ok((
        StatusCode::CREATED,
        Json(DocumentCommandResponse {
            id,
            status: "indexed",
        }),
    ))
}

/// POST /v1/docs/index-directory
pub async fn index_directory(
    State(handlers): State<DocumentHandlers>,
    Json(req): Json<IndexDirectoryRequest>,
) -> Result<Json<IndexDirectoryResponse>, ApiError> {
    if req.directory.trim().is_empty() {
        return Err(ValidationError::empty_field("directory").into());
    }

    let extensions = req
        .file_extensions
        .filter(|exts| !exts.is_empty())
        .unwrap_or_else(|| handlers.file_extensions.clone());

    let indexed = handlers
        .index
        .index_directory(FsPath::new(&req.directory), &extensions)
        .await?;
    tracing::info!(directory = %req.directory, indexed, "Directory indexed");

    Ok(Json(IndexDirectoryResponse {
        directory: req.directory,
        indexed,
    }))
}

/// POST /v1/docs/search
pub async fn search(
    State(handlers): State<DocumentHandlers>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if req.n_results == 0 || req.n_results > MAX_SEARCH_RESULTS {
        return Err(ValidationError::out_of_range(
            "n_results",
            1,
            MAX_SEARCH_RESULTS as i64,
            req.n_results as i64,
        )
        .into());
    }

    let results = handlers
        .index
        .search(&req.query, req.n_results as usize, req.filter.as_ref())
        .await?;

    Ok(Json(SearchResponse {
        count: results.len(),
        query: req.query,
        results,
    }))
}

/// GET /v1/docs/stats
pub async fn stats(
    State(handlers): State<DocumentHandlers>,
) -> Result<Json<CollectionStats>, ApiError> {
    Ok(Json(handlers.index.stats().await?))
}

/// GET /v1/docs/:id
pub async fn get_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Result<Json<IndexedDocument>, ApiError> {
    handlers
        .index
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Document", id))
}

/// DELETE /v1/docs/:id
pub async fn delete_document(
    State(handlers): State<DocumentHandlers>,
    Path(id): Path<String>,
) -> Result<Json<DocumentCommandResponse>, ApiError> {
    if !handlers.index.delete(&id).await? {
        return Err(ApiError::not_found("Document", id));
    }
    Ok(Json(DocumentCommandResponse {
        id,
        status: "deleted",
    }))
}

/// POST /v1/docs/clear
pub async fn clear(
    State(handlers): State<DocumentHandlers>,
) -> Result<Json<StatusResponse>, ApiError> {
    handlers.index.clear().await?;
    tracing::warn!("Document index cleared");
    Ok(Json(StatusResponse { status: "cleared" }))
}
