//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway core to external systems:
//! - `ai` - Interpreter backends (OpenAI-compatible, mock)
//! - `http` - REST API surface

pub mod ai;
pub mod http;
