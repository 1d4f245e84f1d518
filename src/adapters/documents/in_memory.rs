//! In-Memory Document Index
//!
//! Keeps runbooks in memory. With an [`EmbeddingProvider`] attached, every
//! document is embedded when indexed and searches rank by cosine
//! similarity to the embedded query. Without one, ranking falls back to a
//! lexical TF-IDF score. Nothing is persisted across restarts.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::ports::{
    CollectionStats, DocumentIndex, DocumentMetadata, DocumentSearch, DocumentSearchError,
    EmbeddingProvider, IndexedDocument, SearchHit,
};

/// Tokens shorter than this are ignored.
const MIN_TOKEN_LEN: usize = 2;

#[derive(Debug, Clone)]
struct StoredDocument {
    id: String,
    content: String,
    metadata: DocumentMetadata,
    term_counts: HashMap<String, u32>,
    embedding: Option<Vec<f32>>,
}

impl StoredDocument {
    fn new(
        id: String,
        content: String,
        metadata: DocumentMetadata,
        embedding: Option<Vec<f32>>,
    ) -> Self {
        let mut term_counts = HashMap::new();
        for token in tokenize(&content) {
            *term_counts.entry(token).or_insert(0) += 1;
        }
        Self {
            id,
            content,
            metadata,
            term_counts,
            embedding,
        }
    }

    fn matches(&self, filter: &DocumentMetadata) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.metadata.get(key) == Some(value))
    }

    fn to_indexed(&self) -> IndexedDocument {
        IndexedDocument {
            id: self.id.clone(),
            content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }

    fn to_hit(&self, relevance_score: f64) -> SearchHit {
        SearchHit {
            id: self.id.clone(),
            content: self.content.clone(),
            metadata: self.metadata.clone(),
            relevance_score,
        }
    }
}

/// In-memory runbook index.
#[derive(Clone)]
pub struct InMemoryDocumentIndex {
    collection_name: String,
    // Insertion order is the tie-breaker for equal scores
    documents: Arc<RwLock<Vec<StoredDocument>>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl fmt::Debug for InMemoryDocumentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryDocumentIndex")
            .field("collection_name", &self.collection_name)
            .field("semantic", &self.embedder.is_some())
            .finish_non_exhaustive()
    }
}

impl InMemoryDocumentIndex {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
            embedder: None,
        }
    }

    /// Ranks by embedding similarity instead of term overlap.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    async fn insert(
        &self,
        content: String,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<String, DocumentSearchError> {
        // Embed before taking the lock; the call goes over the network
        let embedding = match &self.embedder {
            Some(embedder) => Some(embedder.embed(&content).await?),
            None => None,
        };

        let mut documents = self.documents.write().await;

        let id = match id {
            Some(id) if documents.iter().any(|d| d.id == id) => {
                return Err(DocumentSearchError::DuplicateId(id));
            }
            Some(id) => id,
            None => {
                let mut n = documents.len() + 1;
                while documents.iter().any(|d| d.id == format!("doc_{}", n)) {
                    n += 1;
                }
                format!("doc_{}", n)
            }
        };

        documents.push(StoredDocument::new(id.clone(), content, metadata, embedding));
        Ok(id)
    }
}

/// Cosine similarity; zero when either vector has no magnitude or the
/// dimensions differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn lexical_scores<'a>(query: &str, candidates: &[&'a StoredDocument]) -> Vec<(f64, &'a StoredDocument)> {
    let terms: HashSet<String> = tokenize(query).collect();
    let total = candidates.len() as f64;
    let idf: HashMap<&str, f64> = terms
        .iter()
        .map(|term| {
            let df = candidates
                .iter()
                .filter(|d| d.term_counts.contains_key(term))
                .count() as f64;
            (term.as_str(), (1.0 + total / (1.0 + df)).ln())
        })
        .collect();

    candidates
        .iter()
        .map(|doc| {
            let score: f64 = terms
                .iter()
                .filter_map(|term| {
                    let tf = *doc.term_counts.get(term)? as f64;
                    Some((1.0 + tf.ln()) * idf[term.as_str()])
                })
                .sum();
            (score, *doc)
        })
        .collect()
}

/// Lowercased alphanumeric tokens.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}

fn matches_extension(path: &Path, extensions: &[String]) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        .then(|| format!(".{}", ext))
}

/// Every file below `root`, sorted for a stable indexing order.
async fn collect_files(root: &Path) -> Result<Vec<PathBuf>, DocumentSearchError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    Ok(files)
}

#[async_trait]
impl DocumentSearch for InMemoryDocumentIndex {
    async fn search(
        &self,
        query: &str,
        n_results: usize,
        filter: Option<&DocumentMetadata>,
    ) -> Result<Vec<SearchHit>, DocumentSearchError> {
        if query.trim().is_empty() {
            return Err(DocumentSearchError::InvalidQuery("query must not be empty".to_string()));
        }

        let query_embedding = match &self.embedder {
            Some(embedder) => Some(embedder.embed(query).await?),
            None => None,
        };

        let documents = self.documents.read().await;
        let candidates: Vec<&StoredDocument> = documents
            .iter()
            .filter(|d| filter.map_or(true, |f| d.matches(f)))
            .collect();

        let mut scored: Vec<(f64, &StoredDocument)> = match &query_embedding {
            Some(query) => candidates
                .into_iter()
                .map(|doc| {
                    let similarity = doc
                        .embedding
                        .as_deref()
                        .map_or(0.0, |e| cosine_similarity(query, e));
                    (similarity, doc)
                })
                .collect(),
            None => lexical_scores(query, &candidates),
        };

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(n_results);

        let hits: Vec<SearchHit> = scored
            .into_iter()
            .map(|(score, doc)| doc.to_hit(score))
            .collect();

        tracing::info!(
            query,
            results_count = hits.len(),
            n_results,
            semantic = query_embedding.is_some(),
            "Searched documents"
        );
        Ok(hits)
    }
}

#[async_trait]
impl DocumentIndex for InMemoryDocumentIndex {
    async fn index(
        &self,
        content: String,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<String, DocumentSearchError> {
        let id = self.insert(content, metadata, id).await?;
        tracing::info!(doc_id = %id, "Indexed document");
        Ok(id)
    }

    async fn index_directory(
        &self,
        directory: &Path,
        extensions: &[String],
    ) -> Result<usize, DocumentSearchError> {
        if !directory.exists() {
            tracing::warn!(path = %directory.display(), "Directory does not exist");
            return Ok(0);
        }

        let mut indexed = 0;
        for path in collect_files(directory).await? {
            let Some(extension) = matches_extension(&path, extensions) else {
                continue;
            };

            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to read file");
                    continue;
                }
            };

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut metadata = DocumentMetadata::new();
            metadata.insert("source".to_string(), Value::String(path.display().to_string()));
            metadata.insert("filename".to_string(), Value::String(filename));
            metadata.insert("extension".to_string(), Value::String(extension));

            let id = format!("file_{}_{}", stem, indexed);
            match self.insert(content, metadata, Some(id)).await {
                Ok(_) => indexed += 1,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to index file");
                }
            }
        }

        tracing::info!(directory = %directory.display(), indexed_count = indexed, "Indexed directory");
        Ok(indexed)
    }

    async fn get(&self, id: &str) -> Result<Option<IndexedDocument>, DocumentSearchError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).map(StoredDocument::to_indexed))
    }

    async fn delete(&self, id: &str) -> Result<bool, DocumentSearchError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        let removed = documents.len() < before;
        if removed {
            tracing::info!(doc_id = id, "Deleted document");
        }
        Ok(removed)
    }

    async fn clear(&self) -> Result<(), DocumentSearchError> {
        self.documents.write().await.clear();
        tracing::info!(collection = %self.collection_name, "Cleared collection");
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, DocumentSearchError> {
        Ok(CollectionStats {
            collection_name: self.collection_name.clone(),
            document_count: self.documents.read().await.len(),
        })
    }
}
