//! HTTP DTOs for runbook index endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::agent::tool_arguments::DEFAULT_SEARCH_RESULTS;
use crate::ports::{DocumentMetadata, SearchHit};

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDocumentRequest {
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDirectoryRequest {
    pub directory: String,
    /// Overrides the configured extensions
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_n_results")]
    pub n_results: u32,
    #[serde(default)]
    pub filter: Option<DocumentMetadata>,
}

fn default_n_results() -> u32 {
    DEFAULT_SEARCH_RESULTS
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentCommandResponse {
    pub id: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDirectoryResponse {
    pub directory: String,
    pub indexed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
