//! End-to-end trip planning run against live backends.
//!
//! Requires OPENAI_API_KEY, TAVILY_API_KEY, and GPLACES_API_KEY.
//!
//! ```sh
//! cargo run --example plan_trip -- "3 days in Lisbon: hotels, restaurants, museums"
//! ```

use std::sync::Arc;
use wayfarer_core::{Router, RouterConfig, ToolLoop, WorkerAgent, WorkerSpec};
use wayfarer_llm::OpenAiProvider;
use wayfarer_tools::builtins::register_defaults;
use wayfarer_tools::{CapabilityRegistry, GooglePlacesClient, TavilySearchClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let request = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Plan a weekend in Lisbon: hotels, restaurants, museums".to_string());

    let search = Arc::new(TavilySearchClient::from_env()?);
    let places = Arc::new(GooglePlacesClient::from_env()?);
    let mut registry = CapabilityRegistry::new();
    register_defaults(&mut registry, search, places);

    let provider = Arc::new(OpenAiProvider::from_env()?);
    let router = Router::new(
        RouterConfig::default(),
        WorkerAgent::new(provider),
        ToolLoop::new(Arc::new(registry)),
        WorkerSpec::defaults(),
    )?;

    let report = router.run(&request).await?;
    println!("{}", report.document.to_markdown());
    eprintln!(
        "run {} finished in {}ms, {} hops, workers: {:?}",
        report.run_id, report.elapsed_ms, report.hops_used, report.workers_visited
    );

    Ok(())
}
