//! Conversation message types.
//!
//! This module contains types for representing messages exchanged in the
//! chat view, including roles and message content.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the answering backend (or a local error notice).
    Bot,
}

/// A single message in the conversation history.
///
/// Bot messages produced from a successful ask carry a `question_id` iff
/// the backend supplied one; reference resolution is only offered when it
/// is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub text: String,
    /// Backend identifier of the answered question, when supplied.
    pub question_id: Option<i64>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user message with the current timestamp.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            question_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a bot message, optionally tied to an answered question.
    pub fn bot(text: impl Into<String>, question_id: Option<i64>) -> Self {
        Self {
            role: MessageRole::Bot,
            text: text.into(),
            question_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether a "view sources" affordance applies to this message.
    pub fn has_sources(&self) -> bool {
        self.role == MessageRole::Bot && self.question_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_message_with_question_id_offers_sources() {
        let msg = ChatMessage::bot("Y", Some(42));
        assert!(msg.has_sources());
    }

    #[test]
    fn messages_without_question_id_offer_no_sources() {
        assert!(!ChatMessage::bot("no id", None).has_sources());
        assert!(!ChatMessage::user("question?").has_sources());
    }
}
