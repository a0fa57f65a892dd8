//! Chat aggregation service.
//!
//! `ChatService::send_message` is the whole request pipeline: validate the
//! message, hand the transcript to the interpreter, drain the chunk stream
//! in order, and return the concatenated reply. Either the full text comes
//! back or an error does; there is no partial-content result.

use std::sync::Arc;

use futures::StreamExt;

use crate::domain::Conversation;
use crate::ports::{ChatRequest, Interpreter, InterpreterError};

/// Application service backing the `/chat` endpoint.
#[derive(Clone)]
pub struct ChatService {
    interpreter: Arc<dyn Interpreter>,
    system_prompt: Option<String>,
}

impl ChatService {
    /// Creates a new service over the given interpreter.
    pub fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self {
            interpreter,
            system_prompt: None,
        }
    }

    /// Sets a system prompt sent with every request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sends one user message and returns the aggregated reply text.
    ///
    /// The conversation transcript lives for the duration of this call
    /// only; it is dropped at scope exit on every path, so no history
    /// survives across requests.
    ///
    /// # Errors
    ///
    /// - [`ChatError::EmptyMessage`] if the message is empty; the
    ///   interpreter is not invoked in that case. Whitespace-only messages
    ///   are not empty and are forwarded as-is.
    /// - [`ChatError::Interpreter`] if starting or iterating the stream
    ///   fails. Chunks received before the failure are discarded.
    pub async fn send_message(&self, message: &str) -> Result<String, ChatError> {
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut conversation = Conversation::from_user_message(message);

        let mut request = ChatRequest::new();
        if let Some(ref prompt) = self.system_prompt {
            request = request.with_system_prompt(prompt.clone());
        }
        for msg in conversation.messages() {
            request = request.with_message(msg.role, msg.content.clone());
        }

        let mut stream = self.interpreter.stream_chat(request).await?;

        let mut reply = String::new();
        let mut chunks = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(ref content) = chunk.content {
                reply.push_str(content);
            }
            chunks += 1;
        }

        conversation.push_assistant(reply.clone());
        tracing::debug!(
            chunks,
            reply_chars = reply.len(),
            turns = conversation.len(),
            "chat stream complete"
        );

        Ok(reply)
    }
}

/// Errors from the chat pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The message was missing or empty.
    #[error("Message is required")]
    EmptyMessage,

    /// The interpreter failed while starting or streaming the reply.
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}
