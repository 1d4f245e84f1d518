//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - The reasoning engine (prompt + tools in, text or tool calls out)
//! - `EmbeddingProvider` - Text embeddings for semantic runbook search
//! - `ClusterAccessor` - Kubernetes resource snapshots and deletes
//! - `DocumentSearch` / `DocumentIndex` - Runbook search and index management

mod ai_provider;
mod cluster_accessor;
mod document_search;
mod embedding_provider;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use cluster_accessor::{ClusterAccessor, ClusterError};
pub use document_search::{
    CollectionStats, DocumentIndex, DocumentMetadata, DocumentSearch, DocumentSearchError,
    IndexedDocument, SearchHit,
};
pub use embedding_provider::EmbeddingProvider;
