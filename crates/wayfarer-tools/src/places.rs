//! Google Places (New) text search client
//!
//! Thin wrapper over the `places:searchText` endpoint. The field mask is
//! fixed to the handful of fields the planner actually renders.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SEARCH_TEXT_URL: &str = "https://places.googleapis.com/v1/places:searchText";

const FIELD_MASK: &str = "places.formattedAddress,places.displayName,places.id,places.location,places.rating,places.googleMapsUri";

/// Default minimum rating filter applied to every search
pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// A place returned by text search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Display name
    pub name: String,
    /// Formatted address
    pub address: String,
    /// Stable place identifier
    pub place_id: String,
    /// Aggregate rating, if known
    pub rating: Option<f64>,
    /// Canonical Google Maps URI
    pub maps_uri: String,
}

impl Place {
    /// Maps deep link built from the place identifier
    #[must_use]
    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps/place/?q=place_id:{}",
            self.place_id
        )
    }
}

/// Trait for place search backends
#[async_trait::async_trait]
pub trait PlacesClient: Send + Sync {
    /// Run a text search, keeping only places at or above `min_rating`
    async fn text_search(&self, query: &str, min_rating: f64) -> Result<Vec<Place>>;
}

/// Places API v1 client
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
}

impl GooglePlacesClient {
    /// Create a new client with the given API key
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
        })
    }

    /// Create a client from the `GPLACES_API_KEY` environment variable
    ///
    /// # Errors
    /// Returns error if the variable is not set
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GPLACES_API_KEY")
            .map_err(|_| Error::InvalidInput("GPLACES_API_KEY not set".to_string()))?;
        Self::new(api_key)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    min_rating: f64,
}

#[derive(Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    id: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    display_name: Option<DisplayName>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    google_maps_uri: Option<String>,
}

#[derive(Deserialize)]
struct DisplayName {
    #[serde(default)]
    text: String,
}

impl From<RawPlace> for Place {
    fn from(raw: RawPlace) -> Self {
        Self {
            name: raw.display_name.map(|d| d.text).unwrap_or_default(),
            address: raw.formatted_address.unwrap_or_default(),
            place_id: raw.id,
            rating: raw.rating,
            maps_uri: raw.google_maps_uri.unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl PlacesClient for GooglePlacesClient {
    async fn text_search(&self, query: &str, min_rating: f64) -> Result<Vec<Place>> {
        debug!(query = %query, min_rating, "Places text search");

        let response = self
            .http
            .post(SEARCH_TEXT_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&SearchTextRequest {
                text_query: query,
                min_rating,
            })
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Execution(format!(
                "Places API returned {}",
                status
            )));
        }

        let body: SearchTextResponse = response
            .json()
            .await
            .map_err(|e| Error::Execution(format!("Malformed Places response: {}", e)))?;

        Ok(body.places.into_iter().map(Place::from).collect())
    }
}
