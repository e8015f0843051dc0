//! Orchestration engine for multi-worker trip planning
//!
//! A router fans a request out to keyword-matched workers. Each worker
//! drives inference turns through `wayfarer-llm` and resolves capability
//! calls through `wayfarer-tools`, under a retry policy and a routing
//! budget. Final answers are merged into a fixed-shape document, with
//! placeholders for sections no worker could fill.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregator;
pub mod conversation;
pub mod error;
pub mod retry;
pub mod router;
pub mod tool_loop;
pub mod workers;

pub use aggregator::{Aggregator, AssembledDocument, Section, PLACEHOLDER};
pub use conversation::{CapabilityCall, CapabilityResult, ConversationState, Message, TurnRole};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use router::{Router, RouterConfig, RunReport};
pub use tool_loop::ToolLoop;
pub use workers::{WorkerAgent, WorkerSpec, TERMINATION_SIGNAL};
