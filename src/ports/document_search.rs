//! Document Search Port - Interface to the runbook knowledge base.
//!
//! [`DocumentSearch`] is all the agent needs. [`DocumentIndex`] adds the
//! management operations exposed over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Metadata attached to an indexed document.
pub type DocumentMetadata = Map<String, Value>;

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Higher is more relevant.
    pub relevance_score: f64,
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Index statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub document_count: usize,
}

/// Port for searching runbooks.
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Returns up to `n_results` hits ordered by descending relevance.
    ///
    /// `filter` keeps only documents whose metadata contains every given
    /// key with an equal value. An empty index yields an empty list.
    async fn search(
        &self,
        query: &str,
        n_results: usize,
        filter: Option<&DocumentMetadata>,
    ) -> Result<Vec<SearchHit>, DocumentSearchError>;
}

/// Port for managing the runbook index.
#[async_trait]
pub trait DocumentIndex: DocumentSearch {
    /// Stores a document and returns its id, generating one when `id` is `None`.
    async fn index(
        &self,
        content: String,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<String, DocumentSearchError>;

    /// Indexes every file under `directory` whose extension is in `extensions`.
    ///
    /// Returns how many files were indexed. A missing directory indexes nothing.
    async fn index_directory(
        &self,
        directory: &Path,
        extensions: &[String],
    ) -> Result<usize, DocumentSearchError>;

    async fn get(&self, id: &str) -> Result<Option<IndexedDocument>, DocumentSearchError>;

    /// Removes a document. Returns false if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, DocumentSearchError>;

    async fn clear(&self) -> Result<(), DocumentSearchError>;

    async fn stats(&self) -> Result<CollectionStats, DocumentSearchError>;
}

/// Document search errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentSearchError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("document already exists: {0}")]
    DuplicateId(String),

    /// The embedding service failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<super::AIError> for DocumentSearchError {
    fn from(err: super::AIError) -> Self {
        Self::Embedding(err.to_string())
    }
}

impl From<std::io::Error> for DocumentSearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
