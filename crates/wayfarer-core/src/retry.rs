//! Retry policy for capability invocations
//!
//! Bounded attempts with a fixed inter-attempt delay. A failure that
//! survives the final attempt becomes a failed result, never an error.

use crate::conversation::{CapabilityCall, CapabilityResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use wayfarer_tools::Capability;

/// Retry policy for a single capability invocation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total attempts
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the inter-attempt delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Invoke a capability under this policy.
    ///
    /// Sleeps `delay` between attempts. After the final failure the error
    /// summary is returned as a failed result rather than propagated.
    pub async fn invoke(
        &self,
        capability: &Arc<dyn Capability>,
        call: &CapabilityCall,
    ) -> CapabilityResult {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match capability.invoke(call.arguments.clone()).await {
                Ok(output) => {
                    if attempt > 1 {
                        debug!(
                            capability = %call.name,
                            attempt,
                            "Invocation succeeded after retry"
                        );
                    }
                    return CapabilityResult::success(&call.id, output);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        warn!(
                            capability = %call.name,
                            attempt,
                            max_attempts = self.max_attempts,
                            delay_ms = self.delay.as_millis() as u64,
                            error = %last_error,
                            "Invocation failed, retrying"
                        );
                        sleep(self.delay).await;
                    } else {
                        warn!(
                            capability = %call.name,
                            attempt,
                            error = %last_error,
                            "Invocation failed, no more retries"
                        );
                    }
                }
            }
        }

        CapabilityResult::failure(&call.id, last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wayfarer_tools::CapabilityDescriptor;

    /// Capability that fails the first `failures` invocations, then succeeds.
    struct FlakyCapability {
        descriptor: CapabilityDescriptor,
        failures: u32,
        invocations: AtomicU32,
    }

    impl FlakyCapability {
        fn new(failures: u32) -> Self {
            Self {
                descriptor: CapabilityDescriptor::new("search_hotels", "Search for hotel options"),
                failures,
                invocations: AtomicU32::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Capability for FlakyCapability {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, _args: serde_json::Value) -> wayfarer_tools::Result<serde_json::Value> {
            let count = self.invocations.fetch_add(1, Ordering::SeqCst);
            if count < self.failures {
                Err(wayfarer_tools::Error::Network("transient error".to_string()))
            } else {
                Ok(serde_json::json!({"name": "Hotel Avenida"}))
            }
        }
    }

    fn call() -> CapabilityCall {
        CapabilityCall {
            id: "call_1".to_string(),
            name: "search_hotels".to_string(),
            arguments: serde_json::json!({"location": "Lisbon"}),
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new().with_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let capability = Arc::new(FlakyCapability::new(0));
        let as_dyn: Arc<dyn Capability> = capability.clone();

        let result = fast_policy().invoke(&as_dyn, &call()).await;

        assert!(!result.failed);
        assert_eq!(result.call_id, "call_1");
        assert_eq!(capability.invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fail_twice_then_succeed() {
        let capability = Arc::new(FlakyCapability::new(2));
        let as_dyn: Arc<dyn Capability> = capability.clone();

        let result = fast_policy().invoke(&as_dyn, &call()).await;

        assert!(!result.failed);
        assert_eq!(result.content["name"], "Hotel Avenida");
        assert_eq!(capability.invocations.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_persistent_failure_becomes_data() {
        let capability = Arc::new(FlakyCapability::new(u32::MAX));
        let as_dyn: Arc<dyn Capability> = capability.clone();

        let result = fast_policy().invoke(&as_dyn, &call()).await;

        assert!(result.failed);
        assert_eq!(result.call_id, "call_1");
        assert!(result.content["error"]
            .as_str()
            .unwrap()
            .contains("transient error"));
        assert_eq!(capability.invocations.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let capability = Arc::new(FlakyCapability::new(1));
        let as_dyn: Arc<dyn Capability> = capability.clone();

        let policy = fast_policy().with_max_attempts(1);
        let result = policy.invoke(&as_dyn, &call()).await;

        assert!(result.failed);
        assert_eq!(capability.invocations.load(Ordering::SeqCst), 1);
    }
}
