//! Accommodation search capability

use crate::error::{Error, Result};
use crate::places::{PlacesClient, DEFAULT_MIN_RATING};
use crate::registry::{Capability, CapabilityDescriptor};
use std::sync::Arc;

const ACCOMMODATION_TYPES: &[&str] =
    &["lodging", "hotel", "guest_house", "bed_and_breakfast", "resort"];

/// Searches a places backend for accommodation options.
pub struct LodgingSearch {
    descriptor: CapabilityDescriptor,
    places: Arc<dyn PlacesClient>,
}

impl LodgingSearch {
    /// Create a new lodging search capability.
    #[must_use]
    pub fn new(places: Arc<dyn PlacesClient>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "search_hotels",
            "Search for hotel options. Requires a location; dates, budget, rating \
             and accommodation_type narrow the search.",
        )
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location to search for accommodation in"
                },
                "dates": {
                    "type": "string",
                    "description": "Stay dates, e.g. '2026-07-01 to 2026-07-05'"
                },
                "budget": {
                    "type": "string",
                    "description": "Budget filter, e.g. 'under 150 EUR per night'"
                },
                "rating": {
                    "type": "string",
                    "description": "Rating filter, e.g. '4 stars and up'"
                },
                "accommodation_type": {
                    "type": "string",
                    "enum": ACCOMMODATION_TYPES,
                    "description": "Type of accommodation to search for"
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
impl Capability for LodgingSearch {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let location = args
            .get("location")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("Missing 'location' parameter".to_string()))?;

        let accommodation_type = optional_str(&args, "accommodation_type");
        if let Some(kind) = accommodation_type {
            if !ACCOMMODATION_TYPES.contains(&kind) {
                return Err(Error::InvalidInput(format!(
                    "accommodation_type must be one of: {}",
                    ACCOMMODATION_TYPES.join(", ")
                )));
            }
        }

        let dates = optional_str(&args, "dates");

        let mut parts = vec![location, accommodation_type.unwrap_or("hotel")];
        parts.extend(optional_str(&args, "budget"));
        parts.extend(optional_str(&args, "rating"));
        let query = parts.join(" ");

        let found = self.places.text_search(&query, DEFAULT_MIN_RATING).await?;

        if found.is_empty() {
            let suffix = dates.map(|d| format!(" for dates {}", d)).unwrap_or_default();
            return Ok(serde_json::json!({
                "location": location,
                "results": [],
                "message": format!("No accommodations found in {}{}", location, suffix),
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
            "dates": dates,
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
    async fn test_invalid_accommodation_type() {
        let capability = LodgingSearch::new(Arc::new(FakePlaces::with_places(vec![])));
        let result = capability
            .invoke(serde_json::json!({
                "location": "Lisbon",
                "accommodation_type": "castle"
            }))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_default_type_is_hotel() {
        let places = Arc::new(FakePlaces::with_places(vec![]));
        let backend: Arc<dyn PlacesClient> = places.clone();
        let capability = LodgingSearch::new(backend);

        capability
            .invoke(serde_json::json!({"location": "Lisbon"}))
            .await
            .unwrap();

        assert_eq!(
            places.queries.lock().unwrap().as_slice(),
            &["Lisbon hotel".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_results_message_mentions_dates() {
        let capability = LodgingSearch::new(Arc::new(FakePlaces::with_places(vec![])));

        let output = capability
            .invoke(serde_json::json!({
                "location": "Lisbon",
                "dates": "2026-07-01 to 2026-07-05"
            }))
            .await
            .unwrap();

        assert_eq!(
            output["message"],
            "No accommodations found in Lisbon for dates 2026-07-01 to 2026-07-05"
        );
    }

    #[tokio::test]
    async fn test_results_carry_maps_links() {
        let places = Arc::new(FakePlaces::with_places(vec![FakePlaces::place(
            "Hotel Avenida",
            "Av. da Liberdade 1, Lisbon",
            "pid_123",
            4.4,
        )]));
        let capability = LodgingSearch::new(places);

        let output = capability
            .invoke(serde_json::json!({
                "location": "Lisbon",
                "accommodation_type": "guest_house",
                "budget": "mid-range"
            }))
            .await
            .unwrap();

        assert_eq!(output["total"], 1);
        assert_eq!(
            output["results"][0]["maps_url"],
            "https://www.google.com/maps/place/?q=place_id:pid_123"
        );
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let capability = LodgingSearch::new(Arc::new(FakePlaces::failing()));
        let result = capability
            .invoke(serde_json::json!({"location": "Lisbon"}))
            .await;
        assert!(result.is_err());
    }
}
