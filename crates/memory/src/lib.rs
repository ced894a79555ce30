//! Conversation history and document retrieval for Sommelier.
//!
//! Two stores live here:
//! - [`ConversationStore`] — per-user bounded conversation windows,
//!   process-lifetime only.
//! - [`DocumentIndex`] — the fixed wine-knowledge corpus with cosine
//!   nearest-neighbor search.

pub mod corpus;
pub mod history;
pub mod index;

pub use corpus::{Document, load_corpus, parse_corpus};
pub use history::{ConversationStore, Session};
pub use index::{DocumentIndex, SearchHit};
