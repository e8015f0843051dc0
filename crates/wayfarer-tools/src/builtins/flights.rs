//! Flight option search capability

use crate::error::{Error, Result};
use crate::registry::{Capability, CapabilityDescriptor};
use crate::search::{WebSearchClient, DEFAULT_MAX_RESULTS};
use std::sync::Arc;

/// Searches the web for flight options between two locations.
pub struct FlightSearch {
    descriptor: CapabilityDescriptor,
    search: Arc<dyn WebSearchClient>,
}

impl FlightSearch {
    /// Create a new flight search capability.
    #[must_use]
    pub fn new(search: Arc<dyn WebSearchClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_flights",
            "Search for flight options.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "Departure city or airport"
                },
                "destination": {
                    "type": "string",
                    "description": "Arrival city or airport"
                },
                "dates": {
                    "type": "string",
                    "description": "Travel dates, e.g. '2026-09-01 to 2026-09-08'"
                }
            },
            "required": ["origin", "destination", "dates"]
        }));

        Self { descriptor, search }
    }
}

fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("Missing '{}' parameter", key)))
}

#[async_trait::async_trait]
impl Capability for FlightSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let origin = required_str(&args, "origin")?;
        let destination = required_str(&args, "destination")?;
        let dates = required_str(&args, "dates")?;

        let query = format!(
            "Flight options from {} to {} on {}",
            origin, destination, dates
        );
        let hits = self.search.search(&query, DEFAULT_MAX_RESULTS).await?;

        Ok(serde_json::json!({
            "origin": origin,
            "destination": destination,
            "dates": dates,
            "total": hits.len(),
            "results": hits,
        }))
    }
}
