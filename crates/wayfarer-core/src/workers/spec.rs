//! Worker specifications
//!
//! A worker is a named unit with a fixed capability whitelist, an
//! instruction profile, and routing keywords. Specs are built at startup
//! and immutable for the run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sentinel phrase a worker answers with when a request is out of scope.
pub const TERMINATION_SIGNAL: &str =
    "I'm sorry, but I am not designed to handle that request.";

fn default_true() -> bool {
    true
}

/// Worker specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSpec {
    /// Unique worker identifier (e.g. "logistics", "dining")
    pub id: String,
    /// Human-readable name, used as the document section title
    pub name: String,
    /// Worker description
    pub description: String,
    /// Instruction profile (system prompt)
    pub instructions: String,
    /// Capability whitelist
    pub capabilities: HashSet<String>,
    /// Keywords that route a request to this worker
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Sentinel phrase meaning "out of scope", when the worker uses one
    #[serde(default)]
    pub termination_signal: Option<String>,
    /// Whether the worker is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl WorkerSpec {
    /// Create a new spec with an empty whitelist and no keywords
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            instructions: String::new(),
            capabilities: HashSet::new(),
            keywords: Vec::new(),
            termination_signal: Some(TERMINATION_SIGNAL.to_string()),
            enabled: true,
        }
    }

    /// Set the instruction profile
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the capability whitelist
    #[must_use]
    pub fn with_capabilities(
        mut self,
        capabilities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Set the routing keywords
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Check if a capability is on this worker's whitelist
    #[must_use]
    pub fn permits(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Check if a request routes to this worker by keyword match
    #[must_use]
    pub fn matches_request(&self, request: &str) -> bool {
        let lower = request.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
    }

    /// The logistics worker: flights and accommodation
    #[must_use]
    pub fn logistics() -> Self {
        Self::new(
            "logistics",
            "Logistics",
            "Accommodation and transportation specialist",
        )
        .with_instructions(
            "You are a logistics specialist. Your primary responsibility is to find \
             accommodation and transportation options based on the user's preferences: \
             flights, trains, hotels.\n\
             - Only respond to queries about accommodation and transportation.\n\
             - If a request is outside your scope, explain your primary responsibility \
             and reply with: I'm sorry, but I am not designed to handle that request.\n\
             - When a place id is available, include a maps link \
             (https://www.google.com/maps/place/?q=place_id:<PLACE_ID>).\n\
             - Respond ONLY with the results of your work, do NOT include any other text.",
        )
        .with_capabilities(["search_flights", "search_hotels"])
        .with_keywords([
            "hotel",
            "flight",
            "accommodation",
            "stay",
            "transport",
            "train",
            "airline",
            "lodging",
        ])
    }

    /// The dining worker: restaurants
    #[must_use]
    pub fn dining() -> Self {
        Self::new("dining", "Dining", "Restaurant recommendation specialist")
            .with_instructions(
                "You are a dining specialist. Your primary responsibility is to find \
                 restaurants based on the user's preferences such as cuisine, price range, \
                 and location.\n\
                 - Only respond to queries about restaurant search and recommendations.\n\
                 - If a request is outside your scope, explain your primary responsibility \
                 and reply with: I'm sorry, but I am not designed to handle that request.\n\
                 - When a place id is available, include a maps link \
                 (https://www.google.com/maps/place/?q=place_id:<PLACE_ID>).\n\
                 - Respond ONLY with the results of your work, do NOT include any other text.",
            )
            .with_capabilities(["search_restaurants"])
            .with_keywords([
                "restaurant",
                "food",
                "eat",
                "dining",
                "cuisine",
                "cafe",
                "bar",
                "lunch",
                "dinner",
            ])
    }

    /// The points-of-interest worker: attractions
    #[must_use]
    pub fn attractions() -> Self {
        Self::new(
            "attractions",
            "Points of Interest",
            "Attractions and sightseeing specialist",
        )
        .with_instructions(
            "You are a points-of-interest specialist. Your primary responsibility is to \
             find the best places to visit based on the user's preferences such as \
             museums, parks, and landmarks.\n\
             - Only respond to queries about points of interest.\n\
             - If a request is outside your scope, explain your primary responsibility \
             and reply with: I'm sorry, but I am not designed to handle that request.\n\
             - When a place id is available, include a maps link \
             (https://www.google.com/maps/place/?q=place_id:<PLACE_ID>).\n\
             - Respond ONLY with the results of your work, do NOT include any other text.",
        )
        .with_capabilities(["search_attractions"])
        .with_keywords([
            "attraction",
            "museum",
            "park",
            "landmark",
            "sightseeing",
            "visit",
            "see",
            "monument",
        ])
    }

    /// The research worker: destinations and weather
    #[must_use]
    pub fn research() -> Self {
        Self::new(
            "research",
            "Research",
            "Destination research and weather specialist",
        )
        .with_instructions(
            "You are a research specialist focused on gathering and analyzing travel \
             information.\n\
             - Use your search capabilities to find destination facts and forecasts.\n\
             - Focus ONLY on research-related tasks.\n\
             - Present findings as a clear, factual summary with sources when available.\n\
             - If a request is outside your scope, reply with: I'm sorry, but I am not \
             designed to handle that request.",
        )
        .with_capabilities(["search_destinations", "search_weather"])
        .with_keywords([
            "weather",
            "destination",
            "forecast",
            "research",
            "climate",
            "season",
            "when to go",
        ])
    }

    /// The default worker set, in canonical section order
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::logistics(),
            Self::dining(),
            Self::attractions(),
            Self::research(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_membership() {
        let spec = WorkerSpec::logistics();
        assert!(spec.permits("search_hotels"));
        assert!(spec.permits("search_flights"));
        assert!(!spec.permits("search_restaurants"));
    }

    #[test]
    fn test_empty_whitelist_permits_nothing() {
        let spec = WorkerSpec::new("bare", "Bare", "No capabilities");
        assert!(!spec.permits("search_hotels"));
    }

    #[test]
    fn test_keyword_routing() {
        let dining = WorkerSpec::dining();
        assert!(dining.matches_request("Where should I eat in Tokyo?"));
        assert!(dining.matches_request("best RESTAURANTS near Ginza"));
        assert!(!dining.matches_request("cheapest flights to Tokyo"));
    }

    #[test]
    fn test_defaults_cover_all_builtin_capabilities() {
        let workers = WorkerSpec::defaults();
        let all: HashSet<&str> = workers
            .iter()
            .flat_map(|w| w.capabilities.iter().map(String::as_str))
            .collect();

        for name in [
            "search_destinations",
            "search_weather",
            "search_flights",
            "search_hotels",
            "search_attractions",
            "search_restaurants",
        ] {
            assert!(all.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_termination_signal_set_by_default() {
        let spec = WorkerSpec::dining();
        assert_eq!(spec.termination_signal.as_deref(), Some(TERMINATION_SIGNAL));
    }
}
