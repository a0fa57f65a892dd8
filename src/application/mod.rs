//! Application layer - orchestrates the gateway's single operation.
//!
//! This layer sits between the HTTP adapter and the interpreter port:
//! it validates input, owns the per-request conversation transcript, and
//! aggregates the streamed reply.

pub mod chat;

pub use chat::{ChatError, ChatService};
