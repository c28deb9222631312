//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation session
///
/// Owned exclusively by the connection task for the lifetime of the
/// transport; nothing else mutates the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier (opaque, unique among open sessions)
    pub id: String,
    /// Application this conversation is about
    pub application_id: String,
    /// Subject context, immutable once set
    context: Option<serde_json::Value>,
    /// Messages in the session
    pub messages: Vec<ChatMessage>,
    /// Next message identifier
    next_message_id: u64,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    pub fn new(
        id: impl Into<String>,
        application_id: impl Into<String>,
        context: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            application_id: application_id.into(),
            context,
            messages: Vec::new(),
            next_message_id: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the subject context, if one was set at session start
    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    /// Set the subject context. Ignored if a context is already present:
    /// the context is immutable once set.
    pub fn set_context(&mut self, context: serde_json::Value) {
        if self.context.is_none() {
            self.context = Some(context);
        }
    }

    /// Append a user message to the transcript
    pub fn add_user_message(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::ROLE_USER, content, false)
    }

    /// Append an assistant message to the transcript
    pub fn add_assistant_message(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::ROLE_ASSISTANT, content, false)
    }

    /// Append the synthetic assistant greeting.
    ///
    /// Greetings are flagged so they can be excluded from the history
    /// forwarded to the analyzer.
    pub fn add_greeting(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::ROLE_ASSISTANT, content, true)
    }

    fn push(&mut self, role: &str, content: impl Into<String>, greeting: bool) -> &ChatMessage {
        let message = ChatMessage {
            id: self.next_message_id,
            role: role.to_string(),
            content: content.into(),
            timestamp: Utc::now(),
            greeting,
        };
        self.next_message_id += 1;
        self.updated_at = Utc::now();
        self.messages.push(message);
        self.messages.last().expect("message just pushed")
    }

    /// Transcript entries to forward to the analyzer: every message in
    /// arrival order, greeting excluded.
    pub fn history(&self) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| !m.greeting).collect()
    }

    /// Number of user messages in the transcript
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatMessage::ROLE_USER)
            .count()
    }
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier, monotonic by arrival within the session
    pub id: u64,
    /// Message role (user, assistant)
    pub role: String,
    /// Message content
    pub content: String,
    /// Message timestamp
    pub timestamp: DateTime<Utc>,
    /// Synthetic greeting marker; greetings never reach the analyzer
    #[serde(default)]
    pub greeting: bool,
}

impl ChatMessage {
    pub const ROLE_USER: &'static str = "user";
    pub const ROLE_ASSISTANT: &'static str = "assistant";
}
