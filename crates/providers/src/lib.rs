//! Provider implementations for Sommelier.
//!
//! One implementation ships: the OpenAI-compatible provider, which
//! covers OpenAI itself and the many services exposing the same
//! `/chat/completions` and `/embeddings` surface.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
