//! Search capability — wine-knowledge retrieval over the document index.

use async_trait::async_trait;
use sommelier_core::capability::Capability;
use sommelier_core::error::ToolError;
use sommelier_memory::DocumentIndex;
use std::sync::Arc;
use tracing::debug;

/// Retrieval over the fixed wine-pairing corpus.
///
/// The advertised name carries the bracketed argument hint the model is
/// expected to echo back in its COMMAND section.
pub struct SearchCapability {
    index: Arc<DocumentIndex>,
    top_k: usize,
}

impl SearchCapability {
    pub fn new(index: Arc<DocumentIndex>, top_k: usize) -> Self {
        Self { index, top_k }
    }
}

#[async_trait]
impl Capability for SearchCapability {
    fn name(&self) -> &str {
        "Search[query]"
    }

    fn description(&self) -> &str {
        "useful when you want to search for a knowledge of wine pairing or a wine \
         recommendation, the input of this command is a query, such as \"Search[Riesling]\" \
         or \"Search[What is the best wine for a steak dinner?]\""
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let hits = self
            .index
            .nearest(input, self.top_k)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "search".into(),
                reason: e.to_string(),
            })?;

        debug!(query = %input, results = hits.len(), "Search capability invoked");

        let listing = hits
            .iter()
            .enumerate()
            .map(|(rank, hit)| format!("[{}]: {}", rank, hit.content))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(listing)
    }
}
