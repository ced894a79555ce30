//! Capability trait — the abstraction over agent commands.
//!
//! A capability is a named, described, invokable unit the dispatch loop
//! can run on the model's behalf. The contract is a single string in and
//! a single string out: the model writes `Name[argument]` into its
//! COMMAND section, the dispatch loop extracts the argument and hands it
//! to the matching capability.
//!
//! Exactly one capability (Search) ships today, but the registry is open
//! to extension without modifying the dispatch loop.

use async_trait::async_trait;
use std::collections::HashMap;
use crate::error::ToolError;

/// The core Capability trait.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The advertised name, including the bracketed argument hint
    /// (e.g., "Search[query]").
    fn name(&self) -> &str;

    /// A description of what this capability does, shown to the model
    /// in the computer-screen prompt segment.
    fn description(&self) -> &str;

    /// Invoke the capability with the extracted argument string.
    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// Normalize a capability name for dispatch matching: strip the
/// bracketed argument suffix, if any, and lower-case the rest.
///
/// `"Search[query]"` and `"search"` both normalize to `"search"`.
pub fn registry_key(name: &str) -> String {
    let base = match name.find('[') {
        Some(pos) if name.ends_with(']') => &name[..pos],
        _ => name,
    };
    base.to_lowercase()
}

/// A registry of available capabilities, keyed by normalized name.
///
/// The dispatch loop uses this to:
/// 1. Render the advertised command list for the computer-screen segment
/// 2. Look up a capability when the model issues a command
pub struct CapabilityRegistry {
    capabilities: Vec<Box<dyn Capability>>,
    by_key: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Register a capability. Replaces any existing capability whose
    /// name normalizes to the same key.
    pub fn register(&mut self, capability: Box<dyn Capability>) {
        let key = registry_key(capability.name());
        match self.by_key.get(&key).copied() {
            Some(index) => self.capabilities[index] = capability,
            None => {
                self.by_key.insert(key, self.capabilities.len());
                self.capabilities.push(capability);
            }
        }
    }

    /// Look up a capability by command name (case-insensitive, with or
    /// without the bracketed suffix).
    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.by_key
            .get(&registry_key(name))
            .map(|&index| self.capabilities[index].as_ref())
    }

    /// Render the advertised command list, one `name: description` line
    /// per capability, in registration order.
    pub fn listing(&self) -> String {
        self.capabilities
            .iter()
            .map(|c| format!("{}: {}", c.name(), c.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCapability;

    #[async_trait]
    impl Capability for EchoCapability {
        fn name(&self) -> &str {
            "Echo[text]"
        }
        fn description(&self) -> &str {
            "repeats the input back"
        }
        async fn invoke(&self, input: &str) -> Result<String, ToolError> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn registry_key_strips_suffix_and_lowercases() {
        assert_eq!(registry_key("Search[query]"), "search");
        assert_eq!(registry_key("Search"), "search");
        assert_eq!(registry_key("search"), "search");
        assert_eq!(registry_key("ECHO[text]"), "echo");
    }

    #[test]
    fn registry_key_requires_trailing_bracket_to_strip() {
        // An opening bracket without a closing one is part of the name.
        assert_eq!(registry_key("Odd[name"), "odd[name");
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("Echo").is_some());
        assert!(registry.get("Echo[text]").is_some());
        assert!(registry.get("bogus").is_none());
    }

    #[test]
    fn listing_renders_name_and_description() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability));
        assert_eq!(registry.listing(), "Echo[text]: repeats the input back");
    }

    #[tokio::test]
    async fn invoke_through_registry() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability));
        let capability = registry.get("echo").unwrap();
        let output = capability.invoke("hello").await.unwrap();
        assert_eq!(output, "hello");
    }
}
