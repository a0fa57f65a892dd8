//! Mock interpreter for testing.
//!
//! A configurable, scripted implementation of the Interpreter port so tests
//! can run without a real chat-completions backend.
//!
//! # Features
//!
//! - Queued outcomes: chunk scripts, immediate errors, or mid-stream
//!   failures
//! - Call recording for "collaborator never invoked" assertions
//!
//! # Example
//!
//! ```ignore
//! let interpreter = MockInterpreter::new().with_chunks(vec!["Hi", " there"]);
//!
//! let stream = interpreter.stream_chat(request).await?;
//! // yields "Hi", " there", then a terminal chunk
//! ```

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    ChatRequest, FinishReason, Interpreter, InterpreterError, ReplyChunk, ReplyStream,
};

/// Scripted interpreter for tests.
#[derive(Debug, Clone, Default)]
pub struct MockInterpreter {
    /// Queued outcomes (consumed in order).
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

/// One scripted call outcome.
#[derive(Debug)]
pub enum MockOutcome {
    /// Yield these chunks, then end the stream.
    Chunks(Vec<ReplyChunk>),
    /// Fail before any chunk is produced.
    Error(InterpreterError),
    /// Yield these chunks, then fail mid-stream.
    FailingAfter {
        chunks: Vec<ReplyChunk>,
        error: InterpreterError,
    },
}

impl MockOutcome {
    /// A successful stream of content chunks followed by a terminal chunk.
    pub fn chunks<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chunks: Vec<ReplyChunk> =
            contents.into_iter().map(ReplyChunk::content).collect();
        chunks.push(ReplyChunk::finished(FinishReason::Stop));
        Self::Chunks(chunks)
    }

    /// A successful stream where some chunks carry no content.
    pub fn chunks_with_gaps<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut chunks: Vec<ReplyChunk> = contents
            .into_iter()
            .map(|c| match c {
                Some(text) => ReplyChunk::content(text),
                None => ReplyChunk::empty(),
            })
            .collect();
        chunks.push(ReplyChunk::finished(FinishReason::Stop));
        Self::Chunks(chunks)
    }

    /// A call that fails before streaming starts.
    pub fn error(error: InterpreterError) -> Self {
        Self::Error(error)
    }

    /// A stream that yields some chunks and then fails.
    pub fn failing_after<I, S>(contents: I, error: InterpreterError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FailingAfter {
            chunks: contents.into_iter().map(ReplyChunk::content).collect(),
            error,
        }
    }
}

impl MockInterpreter {
    /// Creates a new mock with an empty outcome queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful stream of content chunks.
    pub fn with_chunks<I, S>(self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_outcome(MockOutcome::chunks(contents))
    }

    /// Queues an arbitrary outcome.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Returns the number of calls made to this interpreter.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next outcome or a default single-chunk reply.
    fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockOutcome::chunks(vec!["Mock reply"]))
    }
}

#[async_trait]
impl Interpreter for MockInterpreter {
    async fn stream_chat(&self, request: ChatRequest) -> Result<ReplyStream, InterpreterError> {
        self.calls.lock().unwrap().push(request);

        match self.next_outcome() {
            MockOutcome::Chunks(chunks) => {
                let items: Vec<Result<ReplyChunk, InterpreterError>> =
                    chunks.into_iter().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            MockOutcome::Error(error) => Err(error),
            MockOutcome::FailingAfter { chunks, error } => {
                let mut items: Vec<Result<ReplyChunk, InterpreterError>> =
                    chunks.into_iter().map(Ok).collect();
                items.push(Err(error));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}
