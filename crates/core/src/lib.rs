//! # Sommelier Core
//!
//! Domain types, traits, and error definitions for the Sommelier
//! wine-pairing chat assistant. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The seams of the system are traits defined here. Implementations live
//! in their respective crates. This enables:
//! - Swapping the LLM backend without touching the agent
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod capability;
pub mod error;
pub mod message;
pub mod provider;
pub mod response;

// Re-export key types at crate root for ergonomics
pub use capability::{Capability, CapabilityRegistry, registry_key};
pub use error::{Error, Result};
pub use message::{PromptMessage, Role, Turn};
pub use provider::{Completion, CompletionRequest, EmbeddingRequest, EmbeddingResponse, Provider};
pub use response::AgentResponse;
