//! Interpreter Port - Interface to the conversational-agent backend.
//!
//! This port abstracts the external chat-completion collaborator, enabling
//! the gateway to aggregate streamed replies without coupling to a specific
//! provider or wire protocol.
//!
//! # Design
//!
//! - Streaming-only: the gateway always consumes the reply as a finite,
//!   one-shot chunk stream
//! - Provider-agnostic message format
//! - Error types for common failure modes (rate limits, timeouts, etc.)
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoInterpreter;
//!
//! #[async_trait]
//! impl Interpreter for EchoInterpreter {
//!     async fn stream_chat(&self, request: ChatRequest) -> Result<ReplyStream, InterpreterError> {
//!         let text = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(Box::pin(futures::stream::iter(vec![Ok(ReplyChunk::content(text))])))
//!     }
//! }
//! ```

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Stream of reply chunks produced by the interpreter. Finite, one-shot,
/// not restartable.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<ReplyChunk, InterpreterError>> + Send>>;

/// Port for the conversational-agent backend.
///
/// Implementations connect to external chat-completion services and
/// translate between the provider-specific API and the gateway's types.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Start a streamed chat completion for the given transcript.
    ///
    /// The returned stream yields chunks in emission order; iteration ends
    /// when the backend finishes the reply or fails.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ReplyStream, InterpreterError>;
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Conversation messages (history + current user message).
    pub messages: Vec<Message>,
    /// System prompt to guide model behavior.
    pub system_prompt: Option<String>,
}

impl ChatRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// One unit of a streamed reply. Optionally carries a text fragment;
/// chunks without content (role deltas, keep-alives) are skipped by the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyChunk {
    /// New content in this chunk, if any.
    pub content: Option<String>,
    /// If present, generation is complete.
    pub finish_reason: Option<FinishReason>,
}

impl ReplyChunk {
    /// Creates a content chunk.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            content: Some(delta.into()),
            finish_reason: None,
        }
    }

    /// Creates an empty (content-less) chunk.
    pub fn empty() -> Self {
        Self {
            content: None,
            finish_reason: None,
        }
    }

    /// Creates a terminal chunk.
    pub fn finished(reason: FinishReason) -> Self {
        Self {
            content: None,
            finish_reason: Some(reason),
        }
    }

    /// Returns true if this is the final chunk.
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit the backend's token limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// An error occurred.
    Error,
}

/// Interpreter backend errors.
///
/// The display text of these errors is what the gateway surfaces in its
/// 500 response body.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// Rate limited by the backend.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Backend is unavailable.
    #[error("interpreter unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request or while iterating the stream.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse a backend response or chunk.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl InterpreterError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_builder_works() {
        let request = ChatRequest::new()
            .with_message(MessageRole::User, "Hello")
            .with_system_prompt("Be helpful");

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, "Hello");
        assert_eq!(request.system_prompt, Some("Be helpful".to_string()));
    }

    #[test]
    fn message_constructors_work() {
        let system = Message::system("You are helpful");
        let user = Message::user("Hello");
        let assistant = Message::assistant("Hi there");

        assert_eq!(system.role, MessageRole::System);
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn reply_chunk_content_is_not_final() {
        let chunk = ReplyChunk::content("Hello");
        assert!(!chunk.is_final());
        assert_eq!(chunk.content.as_deref(), Some("Hello"));
        assert!(chunk.finish_reason.is_none());
    }

    #[test]
    fn reply_chunk_empty_has_no_content() {
        let chunk = ReplyChunk::empty();
        assert!(chunk.content.is_none());
        assert!(!chunk.is_final());
    }

    #[test]
    fn reply_chunk_finished_is_final() {
        let chunk = ReplyChunk::finished(FinishReason::Stop);
        assert!(chunk.is_final());
        assert!(chunk.content.is_none());
        assert_eq!(chunk.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::User).unwrap();
        assert_eq!(json, "\"user\"");

        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let json = serde_json::to_string(&MessageRole::System).unwrap();
        assert_eq!(json, "\"system\"");
    }

    #[test]
    fn finish_reason_serializes_snake_case() {
        let json = serde_json::to_string(&FinishReason::Stop).unwrap();
        assert_eq!(json, "\"stop\"");

        let json = serde_json::to_string(&FinishReason::ContentFilter).unwrap();
        assert_eq!(json, "\"content_filter\"");
    }

    #[test]
    fn interpreter_error_displays_correctly() {
        let err = InterpreterError::rate_limited(30);
        assert_eq!(err.to_string(), "rate limited: retry after 30s");

        let err = InterpreterError::Timeout { timeout_secs: 120 };
        assert_eq!(err.to_string(), "request timed out after 120s");

        let err = InterpreterError::network("connection reset");
        assert_eq!(err.to_string(), "network error: connection reset");
    }
}
