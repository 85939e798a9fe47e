//! The completion service seam.

use async_trait::async_trait;
use llmchess_core::{ConversationMessage, Result, TokenUsage};

/// One chat-completion call: the full conversation for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ConversationMessage>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: &[ConversationMessage]) -> Self {
        Self {
            model: model.into(),
            messages: messages.to_vec(),
        }
    }
}

/// What came back. `content` is `None` when the service returned no choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: Some(content.into()),
            usage,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Anything that can turn a conversation into a reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
