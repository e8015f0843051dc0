//! Conversation state
//!
//! Append-only ordered log of turns plus routing metadata. The router is
//! the only writer; everything else reads through `turns()`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The requesting user
    User,
    /// A worker turn
    Worker,
    /// A capability result turn
    Tool,
}

/// A capability invocation requested by a worker turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCall {
    /// Unique within the enclosing worker turn
    pub id: String,
    /// Capability name
    pub name: String,
    /// Parsed arguments
    pub arguments: serde_json::Value,
}

/// Outcome of one capability invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResult {
    /// Echoes the id of the originating call
    pub call_id: String,
    /// Success payload, or an error payload when `failed`
    pub content: serde_json::Value,
    /// Whether the invocation failed
    pub failed: bool,
}

impl CapabilityResult {
    /// Create a successful result
    #[must_use]
    pub fn success(call_id: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            call_id: call_id.into(),
            content,
            failed: false,
        }
    }

    /// Create a failed result carrying an error summary
    #[must_use]
    pub fn failure(call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: serde_json::json!({"error": error.into()}),
            failed: true,
        }
    }
}

/// One turn in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Turn role
    pub role: TurnRole,
    /// Turn content
    pub content: String,
    /// Capability calls requested by a worker turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_calls: Vec<CapabilityCall>,
    /// Originating call id, on tool turns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Producing worker, on worker turns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// True when this turn stands in for a failed inference call
    #[serde(default)]
    pub degraded: bool,
}

impl Message {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            capability_calls: Vec::new(),
            tool_call_id: None,
            worker_id: None,
            degraded: false,
        }
    }

    /// Create a final worker answer
    #[must_use]
    pub fn worker_answer(worker_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Worker,
            content: content.into(),
            capability_calls: Vec::new(),
            tool_call_id: None,
            worker_id: Some(worker_id.into()),
            degraded: false,
        }
    }

    /// Create a worker turn requesting capability calls
    #[must_use]
    pub fn worker_calls(
        worker_id: impl Into<String>,
        content: impl Into<String>,
        calls: Vec<CapabilityCall>,
    ) -> Self {
        Self {
            role: TurnRole::Worker,
            content: content.into(),
            capability_calls: calls,
            tool_call_id: None,
            worker_id: Some(worker_id.into()),
            degraded: false,
        }
    }

    /// Create a degraded worker turn standing in for a failed inference call
    #[must_use]
    pub fn degraded(worker_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Worker,
            content: content.into(),
            capability_calls: Vec::new(),
            tool_call_id: None,
            worker_id: Some(worker_id.into()),
            degraded: true,
        }
    }

    /// Create a tool turn from a capability result
    #[must_use]
    pub fn tool_result(result: &CapabilityResult) -> Self {
        Self {
            role: TurnRole::Tool,
            content: result.content.to_string(),
            capability_calls: Vec::new(),
            tool_call_id: Some(result.call_id.clone()),
            worker_id: None,
            degraded: false,
        }
    }

    /// Whether this turn requests capability calls
    #[must_use]
    pub fn has_capability_calls(&self) -> bool {
        !self.capability_calls.is_empty()
    }

    /// Whether this is a final worker answer: a non-degraded worker turn
    /// with content and no pending calls
    #[must_use]
    pub fn is_final_answer(&self) -> bool {
        self.role == TurnRole::Worker
            && !self.degraded
            && !self.has_capability_calls()
            && !self.content.trim().is_empty()
    }
}

/// Conversation log and routing metadata for one run
#[derive(Debug)]
pub struct ConversationState {
    turns: Vec<Message>,
    current_worker: Option<String>,
    visited: HashSet<String>,
    hops_remaining: u32,
}

impl ConversationState {
    /// Create a new state with the given routing budget
    #[must_use]
    pub fn new(routing_budget: u32) -> Self {
        Self {
            turns: Vec::new(),
            current_worker: None,
            visited: HashSet::new(),
            hops_remaining: routing_budget,
        }
    }

    /// Append a turn
    pub fn push(&mut self, message: Message) {
        self.turns.push(message);
    }

    /// All turns, in append order
    #[must_use]
    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    /// Set the worker currently driving the conversation
    pub fn set_current_worker(&mut self, worker_id: impl Into<String>) {
        self.current_worker = Some(worker_id.into());
    }

    /// The worker currently driving the conversation
    #[must_use]
    pub fn current_worker(&self) -> Option<&str> {
        self.current_worker.as_deref()
    }

    /// Mark a worker as visited
    pub fn visit(&mut self, worker_id: impl Into<String>) {
        self.visited.insert(worker_id.into());
    }

    /// Whether a worker has completed its turn cycle
    #[must_use]
    pub fn has_visited(&self, worker_id: &str) -> bool {
        self.visited.contains(worker_id)
    }

    /// Visited workers
    #[must_use]
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Consume one routing hop. Returns false when the budget is spent.
    pub fn consume_hop(&mut self) -> bool {
        if self.hops_remaining == 0 {
            return false;
        }
        self.hops_remaining -= 1;
        true
    }

    /// Remaining routing hops
    #[must_use]
    pub fn hops_remaining(&self) -> u32 {
        self.hops_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hotel in Lisbon");
        assert_eq!(user.role, TurnRole::User);
        assert!(!user.has_capability_calls());

        let answer = Message::worker_answer("logistics", "Hotel Avenida, 4.4 stars");
        assert!(answer.is_final_answer());
        assert_eq!(answer.worker_id.as_deref(), Some("logistics"));

        let calls = Message::worker_calls(
            "logistics",
            "",
            vec![CapabilityCall {
                id: "call_1".to_string(),
                name: "search_hotels".to_string(),
                arguments: serde_json::json!({"location": "Lisbon"}),
            }],
        );
        assert!(calls.has_capability_calls());
        assert!(!calls.is_final_answer());

        let degraded = Message::degraded("logistics", "unavailable");
        assert!(degraded.degraded);
        assert!(!degraded.is_final_answer());
    }

    #[test]
    fn test_tool_result_message() {
        let result = CapabilityResult::failure("call_1", "backend unavailable");
        let message = Message::tool_result(&result);
        assert_eq!(message.role, TurnRole::Tool);
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
        assert!(message.content.contains("backend unavailable"));
    }

    #[test]
    fn test_state_append_only() {
        let mut state = ConversationState::new(4);
        state.push(Message::user("plan a trip"));
        let first_content = state.turns()[0].content.clone();

        state.push(Message::worker_answer("research", "Lisbon is mild in May"));
        state.push(Message::worker_answer("dining", "Try Time Out Market"));

        assert_eq!(state.turns().len(), 3);
        assert_eq!(state.turns()[0].content, first_content);
    }

    #[test]
    fn test_hop_budget() {
        let mut state = ConversationState::new(2);
        assert!(state.consume_hop());
        assert!(state.consume_hop());
        assert!(!state.consume_hop());
        assert_eq!(state.hops_remaining(), 0);
    }

    #[test]
    fn test_visited_tracking() {
        let mut state = ConversationState::new(4);
        assert!(!state.has_visited("dining"));
        state.visit("dining");
        assert!(state.has_visited("dining"));
        assert_eq!(state.visited().len(), 1);
    }
}
