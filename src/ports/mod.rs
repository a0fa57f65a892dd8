//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application core and the outside world. Adapters implement these
//! ports.
//!
//! The gateway has a single port: the [`Interpreter`], the external
//! conversational-agent backend that turns a transcript into a stream of
//! reply chunks.

mod interpreter;

pub use interpreter::{
    ChatRequest, FinishReason, Interpreter, InterpreterError, Message, MessageRole, ReplyChunk,
    ReplyStream,
};
