//! Built-in trip-planning capabilities
//!
//! Research capabilities run on a web search backend; lodging, dining and
//! attraction lookups run on a places backend. Each capability validates
//! its own arguments and builds its own query string.

pub mod attractions;
pub mod destinations;
pub mod dining;
pub mod flights;
pub mod lodging;
pub mod weather;

pub use attractions::AttractionSearch;
pub use destinations::DestinationSearch;
pub use dining::DiningSearch;
pub use flights::FlightSearch;
pub use lodging::LodgingSearch;
pub use weather::WeatherSearch;

use crate::places::PlacesClient;
use crate::registry::CapabilityRegistry;
use crate::search::WebSearchClient;
use std::sync::Arc;

/// Register the full built-in capability set
pub fn register_defaults(
    registry: &mut CapabilityRegistry,
    search: Arc<dyn WebSearchClient>,
    places: Arc<dyn PlacesClient>,
) {
    registry.register(Arc::new(DestinationSearch::new(Arc::clone(&search))));
    registry.register(Arc::new(WeatherSearch::new(Arc::clone(&search))));
    registry.register(Arc::new(FlightSearch::new(search)));
    registry.register(Arc::new(LodgingSearch::new(Arc::clone(&places))));
    registry.register(Arc::new(DiningSearch::new(Arc::clone(&places))));
    registry.register(Arc::new(AttractionSearch::new(places)));
}
