//! Weather lookup capability

use crate::error::{Error, Result};
use crate::registry::{Capability, CapabilityDescriptor};
use crate::search::{WebSearchClient, DEFAULT_MAX_RESULTS};
use std::sync::Arc;

/// Fetches a weather forecast for a location via web search.
pub struct WeatherSearch {
    descriptor: CapabilityDescriptor,
    search: Arc<dyn WebSearchClient>,
}

impl WeatherSearch {
    /// Create a new weather search capability.
    #[must_use]
    pub fn new(search: Arc<dyn WebSearchClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_weather",
            "Get weather forecast for a location.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location to fetch the forecast for"
                }
            },
            "required": ["location"]
        }));

        Self { descriptor, search }
    }
}

#[async_trait::async_trait]
impl Capability for WeatherSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'location' parameter".to_string()))?;

        if location.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Location must not be empty".to_string(),
            ));
        }

        let query = format!("Weather in {}", location);
        let hits = self.search.search(&query, DEFAULT_MAX_RESULTS).await?;

        Ok(serde_json::json!({
            "location": location,
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
    async fn test_query_includes_location() {
        let search = Arc::new(FakeSearch::with_hits(vec![]));
        let backend: Arc<dyn WebSearchClient> = search.clone();
        let capability = WeatherSearch::new(backend);

        capability
            .invoke(serde_json::json!({"location": "Lisbon"}))
            .await
            .unwrap();

        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            &["Weather in Lisbon".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_location_rejected() {
        let capability = WeatherSearch::new(Arc::new(FakeSearch::with_hits(vec![])));
        let result = capability.invoke(serde_json::json!({"location": "  "})).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
