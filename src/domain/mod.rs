//! Domain layer containing the gateway's core types.
//!
//! # Module Organization
//!
//! - `conversation` - Per-request conversation transcript

pub mod conversation;

pub use conversation::Conversation;
