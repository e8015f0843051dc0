//! Worker specifications and the agent that drives their turns

pub mod agent;
pub mod spec;

pub use agent::WorkerAgent;
pub use spec::{WorkerSpec, TERMINATION_SIGNAL};
