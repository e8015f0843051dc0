//! Destination research capability

use crate::error::{Error, Result};
use crate::registry::{Capability, CapabilityDescriptor};
use crate::search::{WebSearchClient, DEFAULT_MAX_RESULTS};
use std::sync::Arc;

/// Searches the web for destination information.
pub struct DestinationSearch {
    descriptor: CapabilityDescriptor,
    search: Arc<dyn WebSearchClient>,
}

impl DestinationSearch {
    /// Create a new destination search capability.
    #[must_use]
    pub fn new(search: Arc<dyn WebSearchClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_destinations",
            "Search for travel destinations and their information.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Destination search query"
                }
            },
            "required": ["query"]
        }));

        Self { descriptor, search }
    }
}

#[async_trait::async_trait]
impl Capability for DestinationSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'query' parameter".to_string()))?;

        if query.trim().is_empty() {
            return Err(Error::InvalidInput("Query must not be empty".to_string()));
        }

        let hits = self.search.search(query, DEFAULT_MAX_RESULTS).await?;

        Ok(serde_json::json!({
            "query": query,
            "total": hits.len(),
            "results": hits,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::testutil::FakeSearch;

    #[tokio::test]
    async fn test_missing_query() {
        let capability = DestinationSearch::new(Arc::new(FakeSearch::with_hits(vec![])));
        let result = capability.invoke(serde_json::json!({})).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_passthrough() {
        let search = Arc::new(FakeSearch::with_hits(vec![FakeSearch::hit(
            "Lisbon guide",
            "https://example.com/lisbon",
            "Hills and trams.",
        )]));
        let backend: Arc<dyn WebSearchClient> = search.clone();
        let capability = DestinationSearch::new(backend);

        let output = capability
            .invoke(serde_json::json!({"query": "Lisbon in spring"}))
            .await
            .unwrap();

        assert_eq!(output["total"], 1);
        assert_eq!(output["results"][0]["title"], "Lisbon guide");
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            &["Lisbon in spring".to_string()]
        );
    }
}
