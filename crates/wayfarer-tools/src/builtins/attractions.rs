//! Points-of-interest search capability

use crate::error::{Error, Result};
use crate::places::{PlacesClient, DEFAULT_MIN_RATING};
use crate::registry::{Capability, CapabilityDescriptor};
use std::sync::Arc;

const DEFAULT_ATTRACTION_TYPE: &str = "tourist_attraction";

/// Searches a places backend for attractions and points of interest.
pub struct AttractionSearch {
    descriptor: CapabilityDescriptor,
    places: Arc<dyn PlacesClient>,
}

impl AttractionSearch {
    /// Create a new attraction search capability.
    #[must_use]
    pub fn new(places: Arc<dyn PlacesClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_attractions",
            "Search for points of interest and attractions.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location to search for attractions in"
                },
                "attraction_type": {
                    "type": "string",
                    "description": "Type of attraction, e.g. tourist_attraction, museum, \
                                    art_gallery, park, landmark, point_of_interest"
                }
            },
            "required": ["location"]
        }));

        Self { descriptor, places }
    }
}

#[async_trait::async_trait]
impl Capability for AttractionSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("Missing 'location' parameter".to_string()))?;

        let attraction_type = args
            .get("attraction_type")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_ATTRACTION_TYPE);

        let query = format!("{} {}", location, attraction_type);
        let found = self.places.text_search(&query, DEFAULT_MIN_RATING).await?;

        if found.is_empty() {
            return Ok(serde_json::json!({
                "location": location,
                "results": [],
                "message": format!("No {} found in {}", attraction_type, location),
            }));
        }

        let results: Vec<serde_json::Value> = found
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "address": p.address,
                    "rating": p.rating,
                    "maps_url": p.maps_link(),
                })
            })
            .collect();

        Ok(serde_json::json!({
            "location": location,
            "attraction_type": attraction_type,
            "total": results.len(),
            "results": results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::testutil::FakePlaces;

    #[tokio::test]
    async fn test_default_attraction_type() {
        let places = Arc::new(FakePlaces::with_places(vec![]));
        let backend: Arc<dyn PlacesClient> = places.clone();
        let capability = AttractionSearch::new(backend);

        capability
            .invoke(serde_json::json!({"location": "Lisbon"}))
            .await
            .unwrap();

        assert_eq!(
            places.queries.lock().unwrap().as_slice(),
            &["Lisbon tourist_attraction".to_string()]
        );
    }

    #[tokio::test]
    async fn test_explicit_attraction_type() {
        let places = Arc::new(FakePlaces::with_places(vec![FakePlaces::place(
            "MAAT",
            "Av. Brasilia, Lisbon",
            "pid_maat",
            4.5,
        )]));
        let backend: Arc<dyn PlacesClient> = places.clone();
        let capability = AttractionSearch::new(backend);

        let output = capability
            .invoke(serde_json::json!({"location": "Lisbon", "attraction_type": "museum"}))
            .await
            .unwrap();

        assert_eq!(output["attraction_type"], "museum");
        assert_eq!(output["total"], 1);
        assert_eq!(
            places.queries.lock().unwrap().as_slice(),
            &["Lisbon museum".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_location() {
        let capability = AttractionSearch::new(Arc::new(FakePlaces::with_places(vec![])));
        let result = capability.invoke(serde_json::json!({})).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
