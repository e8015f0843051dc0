//! Wayfarer LLM - inference provider abstraction
//!
//! This crate wraps the external inference collaborator behind the
//! [`LlmProvider`] trait:
//! - Chat message and completion types shared by every provider
//! - Tool/function-calling types (`ToolDefinition`, `ToolCall`)
//! - OpenAI: chat-completion provider built on async-openai
//! - Mock: queued provider for deterministic tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod tools;

pub use completion::{
    CompletionRequest, CompletionResponse, TokenUsage, ToolCompletionRequest,
    ToolCompletionResponse,
};
pub use error::{Error, Result};
pub use message::{ChatMessage, ChatRole};
pub use mock::MockProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::LlmProvider;
pub use tools::{ToolCall, ToolChoice, ToolDefinition};
