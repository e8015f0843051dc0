//! Web search backend for research-style capabilities

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Default number of hits per query
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// A single search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Extracted snippet
    pub snippet: String,
}

/// Trait for web search backends
#[async_trait::async_trait]
pub trait WebSearchClient: Send + Sync {
    /// Run a search and return at most `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Tavily search API client
pub struct TavilySearchClient {
    http: reqwest::Client,
    api_key: String,
}

impl TavilySearchClient {
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

    /// Create a client from the `TAVILY_API_KEY` environment variable
    ///
    /// # Errors
    /// Returns error if the variable is not set
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TAVILY_API_KEY")
            .map_err(|_| Error::InvalidInput("TAVILY_API_KEY not set".to_string()))?;
        Self::new(api_key)
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait::async_trait]
impl WebSearchClient for TavilySearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        debug!(query = %query, max_results, "Web search");

        let response = self
            .http
            .post(TAVILY_SEARCH_URL)
            .json(&TavilyRequest {
                api_key: &self.api_key,
                query,
                max_results,
            })
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Execution(format!(
                "Search API returned {}",
                response.status()
            )));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| Error::Execution(format!("Malformed search response: {}", e)))?;

        Ok(body
            .results
            .into_iter()
            .take(max_results)
            .map(|hit| SearchHit {
                title: hit.title,
                url: hit.url,
                snippet: hit.content,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "results": [
                {"title": "Lisbon travel guide", "url": "https://example.com/lisbon", "content": "Hills and trams."},
                {"title": "Best time to visit", "url": "https://example.com/when", "content": "Spring and autumn."}
            ]
        }"#;

        let parsed: TavilyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Lisbon travel guide");
    }

    #[test]
    fn test_parse_empty_response() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
