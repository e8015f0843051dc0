//! Worker agent
//!
//! Wraps the inference provider with a worker's instruction profile. A
//! provider failure produces a degraded turn, never an error; the router
//! decides whether to retry.

use crate::conversation::{CapabilityCall, Message, TurnRole};
use crate::workers::WorkerSpec;
use std::sync::Arc;
use tracing::{error, warn};
use wayfarer_llm::{
    ChatMessage, CompletionRequest, LlmProvider, ToolCompletionRequest, ToolDefinition,
};

/// Drives one worker turn through the inference provider
pub struct WorkerAgent {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: Option<u32>,
}

impl WorkerAgent {
    /// Create an agent using the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            model,
            max_tokens: None,
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the completion token limit
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Run one worker turn.
    ///
    /// Returns a worker turn that carries either a final answer or
    /// capability calls to resolve. A provider failure returns a degraded
    /// turn instead.
    pub async fn run(
        &self,
        spec: &WorkerSpec,
        visible_history: &[Message],
        capabilities: &[ToolDefinition],
    ) -> Message {
        let mut request = CompletionRequest::new(&self.model)
            .with_message(ChatMessage::system(&spec.instructions))
            .with_messages(map_history(visible_history));
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let tool_request = ToolCompletionRequest::new(request, capabilities.to_vec());

        match self.provider.complete_with_tools(tool_request).await {
            Ok(response) => {
                let content = response.content.clone().unwrap_or_default();
                if response.has_tool_calls() {
                    let calls = response
                        .tool_calls
                        .iter()
                        .map(|tc| CapabilityCall {
                            id: tc.id.clone(),
                            name: tc.name.clone(),
                            arguments: parse_arguments(&tc.name, &tc.arguments),
                        })
                        .collect();
                    Message::worker_calls(&spec.id, content, calls)
                } else {
                    Message::worker_answer(&spec.id, content)
                }
            }
            Err(e) => {
                error!(worker = %spec.id, error = %e, "Inference failed");
                Message::degraded(
                    &spec.id,
                    format!("The {} specialist could not produce an answer.", spec.name),
                )
            }
        }
    }
}

/// Parse call arguments, falling back to an empty object when malformed.
fn parse_arguments(capability: &str, raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(
            capability = %capability,
            error = %e,
            arguments = %raw,
            "Failed to parse call arguments, using empty object"
        );
        serde_json::json!({})
    })
}

fn map_history(history: &[Message]) -> Vec<ChatMessage> {
    history
        .iter()
        .filter_map(|turn| match turn.role {
            TurnRole::User => Some(ChatMessage::user(&turn.content)),
            TurnRole::Worker => {
                if turn.degraded || turn.content.is_empty() {
                    return None;
                }
                match &turn.worker_id {
                    Some(id) => Some(ChatMessage::assistant_named(id, &turn.content)),
                    None => Some(ChatMessage::assistant(&turn.content)),
                }
            }
            TurnRole::Tool => turn
                .tool_call_id
                .as_ref()
                .map(|id| ChatMessage::tool_response(id, &turn.content)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_llm::{MockProvider, ToolCall, ToolCompletionResponse};

    struct FailingProvider;

    #[async_trait::async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn supports_tools(&self) -> bool {
            true
        }

        fn default_model(&self) -> &str {
            "failing-model"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> wayfarer_llm::Result<wayfarer_llm::CompletionResponse> {
            Err(wayfarer_llm::Error::Api("provider down".to_string()))
        }

        async fn complete_with_tools(
            &self,
            _request: ToolCompletionRequest,
        ) -> wayfarer_llm::Result<ToolCompletionResponse> {
            Err(wayfarer_llm::Error::Api("provider down".to_string()))
        }
    }

    fn tool_call_response(name: &str, arguments: &str) -> ToolCompletionResponse {
        ToolCompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
            usage: None,
            finish_reason: Some("tool_calls".to_string()),
            model: "mock-model".to_string(),
        }
    }

    #[tokio::test]
    async fn test_tool_call_turn() {
        let provider = MockProvider::new();
        provider.add_tool_response(tool_call_response(
            "search_hotels",
            r#"{"location": "Lisbon"}"#,
        ));

        let agent = WorkerAgent::new(Arc::new(provider));
        let turn = agent
            .run(
                &WorkerSpec::logistics(),
                &[Message::user("hotel in Lisbon")],
                &[],
            )
            .await;

        assert!(turn.has_capability_calls());
        assert_eq!(turn.capability_calls[0].name, "search_hotels");
        assert_eq!(turn.capability_calls[0].arguments["location"], "Lisbon");
    }

    #[tokio::test]
    async fn test_malformed_arguments_fall_back_to_empty_object() {
        let provider = MockProvider::new();
        provider.add_tool_response(tool_call_response("search_hotels", "{not json"));

        let agent = WorkerAgent::new(Arc::new(provider));
        let turn = agent
            .run(
                &WorkerSpec::logistics(),
                &[Message::user("hotel in Lisbon")],
                &[],
            )
            .await;

        assert_eq!(turn.capability_calls[0].arguments, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_final_answer_turn() {
        let provider = MockProvider::new();
        provider.add_text_response("Hotel Avenida, 4.4 stars");

        let agent = WorkerAgent::new(Arc::new(provider));
        let turn = agent
            .run(
                &WorkerSpec::logistics(),
                &[Message::user("hotel in Lisbon")],
                &[],
            )
            .await;

        assert!(turn.is_final_answer());
        assert_eq!(turn.content, "Hotel Avenida, 4.4 stars");
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_degraded_turn() {
        let agent = WorkerAgent::new(Arc::new(FailingProvider));
        let turn = agent
            .run(
                &WorkerSpec::dining(),
                &[Message::user("sushi in Tokyo")],
                &[],
            )
            .await;

        assert!(turn.degraded);
        assert!(!turn.has_capability_calls());
        assert_eq!(turn.worker_id.as_deref(), Some("dining"));
    }
}
