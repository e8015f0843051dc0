//! Tool execution loop
//!
//! Runs the capability calls issued by one worker turn. Whitelist
//! enforcement happens here, before the registry is touched. Calls run
//! concurrently but the returned results preserve issuance order, and the
//! loop itself never fails: every problem becomes a failed result.

use crate::conversation::{CapabilityCall, CapabilityResult};
use crate::retry::RetryPolicy;
use crate::workers::WorkerSpec;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};
use wayfarer_tools::CapabilityRegistry;

/// Executes capability calls on behalf of the router
pub struct ToolLoop {
    registry: Arc<CapabilityRegistry>,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl ToolLoop {
    /// Create a loop over the given registry with default retry policy
    #[must_use]
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            registry,
            retry: RetryPolicy::default(),
            call_timeout: Duration::from_secs(30),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-call timeout (covers all retry attempts of one call)
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Capability definitions visible to a worker, whitelist-filtered
    #[must_use]
    pub fn definitions_for(&self, worker: &WorkerSpec) -> Vec<wayfarer_llm::ToolDefinition> {
        let allowed: HashSet<String> = worker.capabilities.iter().cloned().collect();
        self.registry.llm_definitions_for(&allowed)
    }

    /// Execute a worker turn's capability calls.
    ///
    /// The output has the same length and order as the input, with each
    /// result's `call_id` matching the corresponding call.
    pub async fn execute(
        &self,
        worker: &WorkerSpec,
        calls: &[CapabilityCall],
    ) -> Vec<CapabilityResult> {
        join_all(calls.iter().map(|call| self.run_call(worker, call))).await
    }

    async fn run_call(&self, worker: &WorkerSpec, call: &CapabilityCall) -> CapabilityResult {
        if !worker.permits(&call.name) {
            warn!(
                worker = %worker.id,
                capability = %call.name,
                "Capability not permitted for this worker"
            );
            return CapabilityResult::failure(
                &call.id,
                format!("capability '{}' not permitted for this worker", call.name),
            );
        }

        let capability = match self.registry.resolve(&call.name) {
            Ok(capability) => capability,
            Err(e) => {
                warn!(
                    worker = %worker.id,
                    capability = %call.name,
                    error = %e,
                    "Capability resolution failed"
                );
                return CapabilityResult::failure(&call.id, e.to_string());
            }
        };

        info!(
            worker = %worker.id,
            capability = %call.name,
            "Executing capability"
        );

        match timeout(self.call_timeout, self.retry.invoke(&capability, call)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    worker = %worker.id,
                    capability = %call.name,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Capability invocation timed out"
                );
                CapabilityResult::failure(
                    &call.id,
                    format!(
                        "invocation timed out after {}ms",
                        self.call_timeout.as_millis()
                    ),
                )
            }
        }
    }
}
