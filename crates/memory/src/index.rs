//! Document index — cosine nearest-neighbor search over the corpus.
//!
//! Constructed once from the loaded corpus and shared for the process
//! lifetime. Query strings are embedded through the same [`Provider`]
//! endpoint (and model) that produced the corpus embeddings; that
//! consistency is an operational precondition — mixing embedding models
//! degrades results silently, with no error the index could raise.

use sommelier_core::error::{Error, ProviderError};
use sommelier_core::provider::{EmbeddingRequest, Provider};
use std::sync::Arc;
use tracing::debug;

use crate::corpus::Document;

/// One nearest-neighbor result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The document's position in the corpus.
    pub index: usize,

    /// The document text.
    pub content: String,

    /// Cosine similarity to the query, in [-1, 1].
    pub score: f32,
}

/// The fixed-corpus similarity index.
pub struct DocumentIndex {
    documents: Vec<Document>,
    embedder: Arc<dyn Provider>,
    embedding_model: String,
}

impl DocumentIndex {
    /// Build the index over an already-loaded corpus.
    pub fn new(
        documents: Vec<Document>,
        embedder: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            embedder,
            embedding_model: embedding_model.into(),
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimension of the corpus (0 when empty).
    pub fn dimension(&self) -> usize {
        self.documents.first().map(|d| d.embedding.len()).unwrap_or(0)
    }

    /// The `k` documents nearest to `query`, ordered by descending
    /// cosine similarity; ties keep corpus insertion order.
    pub async fn nearest(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, Error> {
        let response = self
            .embedder
            .embed(EmbeddingRequest {
                model: self.embedding_model.clone(),
                inputs: vec![query.to_string()],
            })
            .await?;

        let query_embedding = response.embeddings.into_iter().next().ok_or_else(|| {
            ProviderError::EmbeddingFailed("embedding response contained no vectors".into())
        })?;

        let mut hits: Vec<SearchHit> = self
            .documents
            .iter()
            .map(|doc| SearchHit {
                index: doc.index,
                content: doc.content.clone(),
                score: cosine_similarity(&doc.embedding, &query_embedding),
            })
            .collect();

        // Stable sort: equal scores stay in insertion order.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        debug!(query_len = query.len(), results = hits.len(), "Index query");
        Ok(hits)
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths, empty vectors, or a zero vector.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    dot / denom
}
