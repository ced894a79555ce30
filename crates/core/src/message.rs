//! Turn and prompt-segment domain types.
//!
//! A `Turn` is one recorded exchange in a user's conversation history.
//! A `PromptMessage` is one role-tagged segment of the message sequence
//! sent to the language model for a single completion call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, computer screen)
    System,
}

/// A single recorded turn in a conversation.
///
/// Immutable once recorded; owned exclusively by the conversation store
/// entry for its user. Only user and assistant turns are ever recorded —
/// system segments are rebuilt for every prompt, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who produced this turn
    pub role: Role,

    /// The text content
    pub text: String,

    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Record a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Record an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One role-tagged segment of a model prompt.
///
/// Unlike [`Turn`] this is a transient value: assembled per call,
/// sent over the wire, and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

impl From<&Turn> for PromptMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_turn() {
        let turn = Turn::user("What pairs with oysters?");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.text, "What pairs with oysters?");
        assert!(!turn.id.is_empty());
    }

    #[test]
    fn turn_serialization_roundtrip() {
        let turn = Turn::assistant("Try a Chablis 🍷");
        let json = serde_json::to_string(&turn).unwrap();
        let deserialized: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.text, "Try a Chablis 🍷");
        assert_eq!(deserialized.role, Role::Assistant);
    }

    #[test]
    fn prompt_message_from_turn() {
        let turn = Turn::user("Hello");
        let msg = PromptMessage::from(&turn);
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
