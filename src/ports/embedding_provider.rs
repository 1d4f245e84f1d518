//! Embedding Provider Port - turns text into vectors for semantic search.

use async_trait::async_trait;

use super::AIError;

/// Port for text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds one piece of text. Every call for the same model returns
    /// vectors of the same dimension.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AIError>;
}
