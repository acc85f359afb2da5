//! Completion module
//!
//! Client for the externally hosted LLM. Given an ordered conversation it
//! returns the list of candidate completions.

pub mod api_client;
pub mod types;

use crate::error::AppError;
use async_trait::async_trait;

pub use api_client::OpenRouterClient;
pub use types::{ChatMessage, CompletionResponse, MessageRole};

/// One-shot completion over an ordered message list
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request a completion for the conversation
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, AppError>;
}
