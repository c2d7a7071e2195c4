//! Tutoring chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting shown when no transcript has been persisted yet.
pub const CHAT_WELCOME: &str = "Hi! I'm your AI Math Tutor. You can ask me any math questions, request explanations of concepts, or get help with problem-solving strategies. What would you like to learn about today?";

/// Tutor reply recorded when the chat relay fails.
pub const CHAT_APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique, time-derived identifier
    pub id: String,
    /// Message body
    pub text: String,
    /// True when the student wrote it, false for the tutor
    pub is_user: bool,
    /// When the message was added
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A message written by the student.
    pub fn from_user(id: String, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            is_user: true,
            timestamp: now,
        }
    }

    /// A message written by the tutor.
    pub fn from_tutor(id: String, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            is_user: false,
            timestamp: now,
        }
    }
}

/// Ordered chat transcript, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Restore a persisted transcript, or start one with the welcome message.
    pub fn load_or_welcome(
        persisted: Option<Vec<ChatMessage>>,
        welcome_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        match persisted {
            Some(messages) => Self { messages },
            None => Self {
                messages: vec![ChatMessage::from_tutor(welcome_id, CHAT_WELCOME, now)],
            },
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
