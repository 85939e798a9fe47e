//! Conversation message types.
//!
//! Each color owns one [`Conversation`]. It grows while a turn is unresolved
//! (prompt, reply, corrective notes) and is cleared once a move lands.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Corrective note injected by the game loop.
    System,
    /// Move request prompt.
    User,
    /// Raw agent reply.
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered message log sent wholesale to the completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages
            .push(ConversationMessage::new(MessageRole::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages
            .push(ConversationMessage::new(MessageRole::Assistant, content));
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.messages
            .push(ConversationMessage::new(MessageRole::System, content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Immutable (color, model) pair assigned at game start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub color: Color,
    pub model: String,
}

impl AgentIdentity {
    pub fn new(color: Color, model: impl Into<String>) -> Self {
        Self {
            color,
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_turn_grows_then_clears() {
        let mut conversation = Conversation::new();
        conversation.push_user("prompt");
        conversation.push_assistant("<move>0</move>");
        conversation.push_system("That move was out of range. Try again.");

        let roles: Vec<MessageRole> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::System]
        );
        assert_eq!(conversation.len(), 3);

        conversation.clear();
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationMessage::new(MessageRole::Assistant, "hi"))
            .unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
