//! Per-request conversation transcript.
//!
//! The transcript is owned by a single request and dropped when the request
//! completes, on success and failure alike. This replaces the shared
//! process-wide history buffer a naive gateway would keep: two in-flight
//! requests can never observe each other's turns, and no reset step is
//! needed between calls.

use crate::ports::Message;

/// The turns of one chat request, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation from a single user message.
    pub fn from_user_message(content: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_user(content);
        conversation
    }

    /// Records a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Records an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// The transcript in emission order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of turns recorded so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
