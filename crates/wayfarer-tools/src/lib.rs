//! Wayfarer Tools - capability registry and search backends
//!
//! This crate provides the capabilities workers can invoke:
//! - Registry: name-based capability registration and resolution
//! - Places: Google Places text search backend
//! - Search: Tavily web search backend
//! - Builtins: the trip-planning capability set

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod places;
pub mod registry;
pub mod search;

pub use error::{Error, Result};
pub use places::{GooglePlacesClient, Place, PlacesClient, DEFAULT_MIN_RATING};
pub use registry::{Capability, CapabilityDescriptor, CapabilityRegistry};
pub use search::{SearchHit, TavilySearchClient, WebSearchClient, DEFAULT_MAX_RESULTS};
