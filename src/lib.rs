//! Chat Gateway - HTTP façade over a conversational-agent interpreter.
//!
//! Accepts a user message on `POST /chat`, streams the reply from an
//! OpenAI-compatible chat-completions backend, and returns the aggregated
//! text as JSON.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
