//! Error types for the Sommelier domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Sommelier operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Capability errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Corpus errors ---
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Session lookup failed: {0}")]
    SessionLookup(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus file unreadable: {path} — {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Corpus file malformed: {0}")]
    Malformed(String),

    #[error("Corpus is empty")]
    Empty,

    #[error("Embedding dimension mismatch: expected {expected}, document {index} has {found}")]
    DimensionMismatch {
        expected: usize,
        index: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn corpus_error_displays_correctly() {
        let err = Error::Corpus(CorpusError::DimensionMismatch {
            expected: 1536,
            index: 3,
            found: 768,
        });
        assert!(err.to_string().contains("1536"));
        assert!(err.to_string().contains("document 3"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::ExecutionFailed {
            tool_name: "search".into(),
            reason: "index unavailable".into(),
        });
        assert!(err.to_string().contains("search"));
        assert!(err.to_string().contains("index unavailable"));
    }
}
