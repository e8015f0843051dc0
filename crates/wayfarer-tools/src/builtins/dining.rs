//! Restaurant search capability

use crate::error::{Error, Result};
use crate::places::{PlacesClient, DEFAULT_MIN_RATING};
use crate::registry::{Capability, CapabilityDescriptor};
use std::sync::Arc;

const PLACE_TYPES: &[&str] = &["restaurant", "food", "cafe", "bakery", "bar"];

/// Searches a places backend for restaurants.
pub struct DiningSearch {
    descriptor: CapabilityDescriptor,
    places: Arc<dyn PlacesClient>,
}

impl DiningSearch {
    /// Create a new dining search capability.
    #[must_use]
    pub fn new(places: Arc<dyn PlacesClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_restaurants",
            "Search for restaurants in a location. Cuisine, budget, rating and \
             place_type narrow the search.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location to search for restaurants in"
                },
                "cuisine": {
                    "type": "string",
                    "description": "Cuisine type, e.g. 'italian', 'japanese', 'indian'"
                },
                "budget": {
                    "type": "string",
                    "description": "Budget filter"
                },
                "rating": {
                    "type": "string",
                    "description": "Rating filter"
                },
                "place_type": {
                    "type": "string",
                    "enum": PLACE_TYPES,
                    "description": "Type of establishment to search for"
                }
            },
            "required": ["location"]
        }));

        Self { descriptor, places }
    }
}

fn optional_str<'a>(args: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

#[async_trait::async_trait]
impl Capability for DiningSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("Missing 'location' parameter".to_string()))?;

        let place_type = optional_str(&args, "place_type");
        if let Some(kind) = place_type {
            if !PLACE_TYPES.contains(&kind) {
                return Err(Error::InvalidInput(format!(
                    "place_type must be one of: {}",
                    PLACE_TYPES.join(", ")
                )));
            }
        }

        let cuisine = optional_str(&args, "cuisine");

        let mut parts = vec![location];
        parts.extend(cuisine);
        parts.push(place_type.unwrap_or("restaurant"));
        parts.extend(optional_str(&args, "budget"));
        parts.extend(optional_str(&args, "rating"));
        let query = parts.join(" ");

        let found = self.places.text_search(&query, DEFAULT_MIN_RATING).await?;

        if found.is_empty() {
            let suffix = cuisine
                .map(|c| format!(" for {} cuisine", c))
                .unwrap_or_default();
            return Ok(serde_json::json!({
                "location": location,
                "results": [],
                "message": format!("No restaurants found in {}{}", location, suffix),
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
            "cuisine": cuisine,
            "total": results.len(),
            "results": results,
        }))
    }
}
