//! Interpreter adapters.
//!
//! Implementations of the Interpreter port.
//!
//! ## Available Adapters
//!
//! - `OpenAiInterpreter` - Streams from any OpenAI-compatible
//!   chat-completions endpoint
//! - `MockInterpreter` - Scripted interpreter for testing

mod mock_interpreter;
mod openai_interpreter;

pub use mock_interpreter::{MockInterpreter, MockOutcome};
pub use openai_interpreter::{OpenAiConfig, OpenAiInterpreter};
