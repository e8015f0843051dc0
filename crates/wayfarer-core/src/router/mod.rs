//! Router/dispatcher
//!
//! Owns the run state machine: ROUTING selects eligible workers by
//! keyword, WORKER_ACTIVE drives one inference turn, TOOL_EXECUTING runs
//! the turn's capability calls and loops back to the same worker until it
//! answers or the routing budget is spent. Workers are dispatched one at
//! a time so the conversation log stays a single linear sequence. When
//! every eligible worker is done the aggregator produces the final
//! document.

use crate::aggregator::{Aggregator, AssembledDocument};
use crate::conversation::{CapabilityResult, ConversationState, Message};
use crate::error::{Error, Result};
use crate::tool_loop::ToolLoop;
use crate::workers::{WorkerAgent, WorkerSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

fn default_routing_budget() -> u32 {
    8
}

fn default_deadline_ms() -> u64 {
    120_000
}

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum number of tool-execution hops per run
    #[serde(default = "default_routing_budget")]
    pub routing_budget: u32,
    /// Run deadline in milliseconds
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routing_budget: default_routing_budget(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl RouterConfig {
    /// Set the routing budget
    #[must_use]
    pub fn with_routing_budget(mut self, budget: u32) -> Self {
        self.routing_budget = budget;
        self
    }

    /// Set the run deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = deadline.as_millis() as u64;
        self
    }

    fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: Uuid,
    /// The assembled document
    pub document: AssembledDocument,
    /// Full conversation log, for replay and debugging
    pub turns: Vec<Message>,
    /// Tool-execution hops consumed
    pub hops_used: u32,
    /// Workers that completed a turn cycle, sorted
    pub workers_visited: Vec<String>,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

/// Drives runs over a fixed worker set
pub struct Router {
    config: RouterConfig,
    agent: WorkerAgent,
    tool_loop: ToolLoop,
    workers: Vec<WorkerSpec>,
    cancel: CancellationToken,
}

impl Router {
    /// Create a router.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when the worker set is empty or the routing
    /// budget is zero
    pub fn new(
        config: RouterConfig,
        agent: WorkerAgent,
        tool_loop: ToolLoop,
        workers: Vec<WorkerSpec>,
    ) -> Result<Self> {
        if workers.is_empty() {
            return Err(Error::InvalidConfig {
                field: "workers".to_string(),
                message: "at least one worker is required".to_string(),
            });
        }
        if config.routing_budget == 0 {
            return Err(Error::InvalidConfig {
                field: "routing_budget".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            config,
            agent,
            tool_loop,
            workers,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that aborts an in-flight run when cancelled.
    ///
    /// A cancelled run proceeds to aggregation with whatever data it has.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute one run for the given request.
    ///
    /// # Errors
    /// `RoutingExhausted` when no worker is eligible for the request;
    /// `DeadlineExceeded` when the deadline passes before any worker
    /// produced output
    pub async fn run(&self, request: &str) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let eligible: Vec<String> = self
            .workers
            .iter()
            .filter(|w| w.enabled && w.matches_request(request))
            .map(|w| w.id.clone())
            .collect();

        if eligible.is_empty() {
            warn!(run_id = %run_id, "No eligible worker for request");
            return Err(Error::RoutingExhausted(request.to_string()));
        }

        info!(
            run_id = %run_id,
            workers = ?eligible,
            budget = self.config.routing_budget,
            "Starting run"
        );

        let mut state = ConversationState::new(self.config.routing_budget);
        state.push(Message::user(request));

        let cut_short = tokio::select! {
            _ = self.cancel.cancelled() => {
                warn!(run_id = %run_id, "Run cancelled, aggregating partial results");
                true
            }
            outcome = timeout(
                self.config.deadline(),
                self.dispatch_all(request, &eligible, &mut state),
            ) => {
                if outcome.is_err() {
                    warn!(
                        run_id = %run_id,
                        deadline_ms = self.config.deadline_ms,
                        "Run deadline exceeded, aggregating partial results"
                    );
                }
                outcome.is_err()
            }
        };

        let has_output = state.turns().iter().any(Message::is_final_answer);
        if cut_short && !has_output {
            return Err(Error::DeadlineExceeded);
        }

        let document = Aggregator::for_workers(&self.workers).assemble(state.turns());
        let hops_used = self.config.routing_budget - state.hops_remaining();
        let mut workers_visited: Vec<String> = state.visited().iter().cloned().collect();
        workers_visited.sort();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            hops_used,
            elapsed_ms,
            sections = document.sections.len(),
            "Run complete"
        );

        Ok(RunReport {
            run_id,
            document,
            turns: state.turns().to_vec(),
            hops_used,
            workers_visited,
            elapsed_ms,
            started_at,
        })
    }

    /// Dispatch every eligible worker, one complete turn cycle at a time.
    async fn dispatch_all(
        &self,
        request: &str,
        eligible: &[String],
        state: &mut ConversationState,
    ) {
        for worker_id in eligible {
            if state.has_visited(worker_id) {
                continue;
            }
            let Some(spec) = self.worker(worker_id) else {
                continue;
            };

            let answer = self.drive_worker(spec, state).await;
            state.visit(&spec.id);

            let declined = spec
                .termination_signal
                .as_ref()
                .is_some_and(|signal| answer.content.contains(signal.as_str()));
            if declined {
                info!(worker = %spec.id, "Worker declined the request as out of scope");
                if let Some(target) = self.redispatch_target(request, state, &spec.id) {
                    info!(
                        from = %spec.id,
                        to = %target.id,
                        "Re-dispatching to covering worker"
                    );
                    self.drive_worker(target, state).await;
                    state.visit(&target.id);
                }
            }
        }
    }

    /// One worker's WORKER_ACTIVE / TOOL_EXECUTING cycle. Returns the
    /// worker's last turn.
    async fn drive_worker(&self, spec: &WorkerSpec, state: &mut ConversationState) -> Message {
        state.set_current_worker(&spec.id);
        let capabilities = self.tool_loop.definitions_for(spec);

        info!(
            worker = %spec.id,
            capabilities = capabilities.len(),
            "Dispatching worker"
        );

        loop {
            let mut turn = self.agent.run(spec, state.turns(), &capabilities).await;
            if turn.degraded {
                warn!(worker = %spec.id, "Inference failed, retrying turn once");
                turn = self.agent.run(spec, state.turns(), &capabilities).await;
            }

            state.push(turn.clone());

            if !turn.has_capability_calls() {
                return turn;
            }

            if !state.consume_hop() {
                warn!(worker = %spec.id, "Routing budget exhausted, ending worker loop");
                // The turn's calls still need results before anyone else
                // takes a turn
                for call in &turn.capability_calls {
                    state.push(Message::tool_result(&CapabilityResult::failure(
                        &call.id,
                        "routing budget exhausted before execution",
                    )));
                }
                return turn;
            }

            let results = self.tool_loop.execute(spec, &turn.capability_calls).await;
            for result in results {
                state.push(Message::tool_result(&result));
            }
        }
    }

    fn worker(&self, id: &str) -> Option<&WorkerSpec> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// The first enabled, unvisited worker (other than the declining one)
    /// whose keywords cover the request.
    fn redispatch_target(
        &self,
        request: &str,
        state: &ConversationState,
        declining: &str,
    ) -> Option<&WorkerSpec> {
        self.workers.iter().find(|w| {
            w.enabled
                && w.id != declining
                && !state.has_visited(&w.id)
                && w.matches_request(request)
        })
    }
}
