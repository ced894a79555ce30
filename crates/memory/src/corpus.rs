//! Corpus loading — the fixed set of precomputed (article, embedding)
//! pairs the document index is built from.
//!
//! The file format is a JSON array of `{"article": …, "embedding": […]}`
//! records, produced offline by running the corpus text through the
//! embedding model configured as `embedding_model`. Loaded once at
//! process start; never mutated afterwards.

use serde::{Deserialize, Serialize};
use sommelier_core::error::CorpusError;
use std::path::Path;

/// One indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The article text.
    pub content: String,

    /// Precomputed embedding vector.
    pub embedding: Vec<f32>,

    /// Position in the corpus file; stable for the process lifetime.
    pub index: usize,
}

/// The on-disk record shape.
#[derive(Deserialize)]
struct CorpusRecord {
    article: String,
    embedding: Vec<f32>,
}

/// Load and validate a corpus file.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>, CorpusError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_corpus(&raw)
}

/// Parse and validate corpus JSON.
///
/// Rejects an empty corpus and any document whose embedding dimension
/// differs from the first document's.
pub fn parse_corpus(raw: &str) -> Result<Vec<Document>, CorpusError> {
    let records: Vec<CorpusRecord> =
        serde_json::from_str(raw).map_err(|e| CorpusError::Malformed(e.to_string()))?;

    if records.is_empty() {
        return Err(CorpusError::Empty);
    }

    let expected = records[0].embedding.len();
    let documents = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            if record.embedding.len() != expected {
                return Err(CorpusError::DimensionMismatch {
                    expected,
                    index,
                    found: record.embedding.len(),
                });
            }
            Ok(Document {
                content: record.article,
                embedding: record.embedding,
                index,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(documents)
}
