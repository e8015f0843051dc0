//! Capability registration and discovery
//!
//! Workers never hold capability instances directly. They name capabilities
//! by string, and the registry is the single resolution point. Whitelist
//! enforcement happens in the execution loop, not here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Metadata and parameter schema for a registered capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Unique capability name
    pub name: String,
    /// Human-readable description, surfaced to the model
    pub description: String,
    /// JSON schema for arguments
    pub parameters: serde_json::Value,
}

impl CapabilityDescriptor {
    /// Create a new descriptor with an empty object schema
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set the parameters schema
    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Trait for capability implementations
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    /// Get the capability descriptor
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Invoke the capability with the given arguments
    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value>;
}

/// Registry mapping capability names to implementations
///
/// Iteration order is deterministic (sorted by name) so that the
/// definitions handed to the model do not shuffle between runs.
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, Arc<dyn Capability>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: BTreeMap::new(),
        }
    }

    /// Register a capability
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        let name = capability.descriptor().name.clone();
        debug!(capability = %name, "Registering capability");
        self.capabilities.insert(name, capability);
    }

    /// Resolve a capability by name
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no capability is registered under
    /// the given name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Capability>> {
        self.capabilities
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Check if a capability exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// List all capability names
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.capabilities.keys().map(|s| s.as_str()).collect()
    }

    /// Get capability count
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Convert the descriptors of a whitelisted subset to LLM tool format
    ///
    /// Names in `allowed` that are not registered are silently skipped;
    /// the execution loop reports those at invocation time.
    #[must_use]
    pub fn llm_definitions_for(&self, allowed: &HashSet<String>) -> Vec<wayfarer_llm::ToolDefinition> {
        self.capabilities
            .values()
            .filter(|c| allowed.contains(&c.descriptor().name))
            .map(|c| {
                let d = c.descriptor();
                wayfarer_llm::ToolDefinition::new(&d.name, &d.description, d.parameters.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCapability {
        descriptor: CapabilityDescriptor,
    }

    impl EchoCapability {
        fn new(name: &str) -> Self {
            Self {
                descriptor: CapabilityDescriptor::new(name, "Echo the input"),
            }
        }
    }

    #[async_trait::async_trait]
    impl Capability for EchoCapability {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
            Ok(args)
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = CapabilityRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.resolve("search_weather").is_err());
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability::new("search_weather")));

        assert!(registry.has("search_weather"));
        assert!(!registry.has("search_flights"));
        assert!(registry.resolve("search_weather").is_ok());

        assert!(matches!(
            registry.resolve("search_flights").err(),
            Some(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_llm_definitions_filtered_by_whitelist() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability::new("search_hotels")));
        registry.register(Arc::new(EchoCapability::new("search_flights")));
        registry.register(Arc::new(EchoCapability::new("search_restaurants")));

        let allowed: HashSet<String> =
            ["search_hotels".to_string(), "search_flights".to_string()].into();
        let defs = registry.llm_definitions_for(&allowed);

        assert_eq!(defs.len(), 2);
        assert!(defs.iter().all(|d| allowed.contains(&d.name)));
    }

    #[test]
    fn test_llm_definitions_deterministic_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(EchoCapability::new("search_weather")));
        registry.register(Arc::new(EchoCapability::new("search_destinations")));

        let allowed: HashSet<String> = [
            "search_destinations".to_string(),
            "search_weather".to_string(),
        ]
        .into();
        let names: Vec<String> = registry
            .llm_definitions_for(&allowed)
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, vec!["search_destinations", "search_weather"]);
    }
}
