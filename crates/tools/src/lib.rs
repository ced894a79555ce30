//! Built-in capability implementations for Sommelier.
//!
//! One capability ships today: wine-knowledge search over the document
//! index. The registry is open to more without touching the dispatch
//! loop.

pub mod search;

use sommelier_core::capability::CapabilityRegistry;
use sommelier_memory::DocumentIndex;
use std::sync::Arc;

pub use search::SearchCapability;

/// Create the default capability registry.
pub fn default_registry(index: Arc<DocumentIndex>, top_k: usize) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register(Box::new(SearchCapability::new(index, top_k)));
    registry
}
