//! OpenAI-compatible interpreter adapter.
//!
//! Streams chat completions over SSE from any endpoint that speaks the
//! OpenAI chat-completions protocol: api.openai.com itself, LM Studio, or
//! another local proxy.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o")
//!     .with_base_url("http://localhost:1234/v1");
//!
//! let interpreter = OpenAiInterpreter::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Each SSE `data:` line is parsed and yielded as a `ReplyChunk` until the
//! `[DONE]` marker is received. Lines split across transport chunks are
//! re-assembled before parsing, and a final line arriving without a
//! trailing newline is flushed when the body ends.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::ports::{
    ChatRequest, FinishReason, Interpreter, InterpreterError, MessageRole, ReplyChunk, ReplyStream,
};

/// Configuration for the OpenAI-compatible adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to request (e.g. "gpt-4o").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout. Bounds the whole streamed exchange so a hung
    /// upstream fails the request instead of suspending it forever.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the model to request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl From<&AiConfig> for OpenAiConfig {
    fn from(config: &AiConfig) -> Self {
        // Offline endpoints (LM Studio style) ignore the credential but
        // still require the header to be present.
        let key = config
            .api_key
            .clone()
            .unwrap_or_else(|| "offline".to_string());

        Self::new(key)
            .with_model(config.model.clone())
            .with_base_url(config.base_url.trim_end_matches('/').to_string())
            .with_timeout(config.timeout())
    }
}

/// Interpreter implementation over an OpenAI-compatible endpoint.
pub struct OpenAiInterpreter {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiInterpreter {
    /// Creates a new interpreter with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, InterpreterError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InterpreterError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts a port request to the wire format.
    fn to_wire_request(&self, request: &ChatRequest) -> WireRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            stream: true,
        }
    }

    /// Sends the streaming request.
    async fn send_request(&self, request: &ChatRequest) -> Result<Response, InterpreterError> {
        let wire_request = self.to_wire_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InterpreterError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    InterpreterError::network(format!("Connection failed: {}", e))
                } else {
                    InterpreterError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, InterpreterError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(InterpreterError::AuthenticationFailed),
            429 => Err(InterpreterError::rate_limited(parse_retry_after(
                &error_body,
            ))),
            400..=499 => Err(InterpreterError::InvalidRequest(error_body)),
            500..=599 => Err(InterpreterError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(InterpreterError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl Interpreter for OpenAiInterpreter {
    async fn stream_chat(&self, request: ChatRequest) -> Result<ReplyStream, InterpreterError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let timeout_secs = self.config.timeout.as_secs() as u32;
        let text_stream = response.bytes_stream().map(move |chunk_result| {
            chunk_result
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .map_err(move |e| {
                    if e.is_timeout() {
                        InterpreterError::Timeout { timeout_secs }
                    } else {
                        InterpreterError::network(format!("Stream error: {}", e))
                    }
                })
        });

        Ok(sse_reply_stream(text_stream))
    }
}

/// Re-assembles SSE lines from transport chunks and parses them.
///
/// Lines may be split across chunks; the incomplete tail is carried between
/// reads. A final line that arrives without a trailing newline is flushed
/// and parsed when the transport stream ends.
fn sse_reply_stream<S>(text_chunks: S) -> ReplyStream
where
    S: Stream<Item = Result<String, InterpreterError>> + Send + 'static,
{
    let stream = text_chunks
        .map(Some)
        // End-of-stream marker that triggers the tail flush.
        .chain(stream::once(futures::future::ready(None)))
        .scan(String::new(), |buffer, item| {
            let results = match item {
                Some(Ok(text)) => {
                    buffer.push_str(&text);
                    let mut lines = Vec::new();
                    while let Some(idx) = buffer.find('\n') {
                        let line = buffer[..idx].trim_end_matches('\r').to_string();
                        buffer.drain(..=idx);
                        lines.push(line);
                    }
                    parse_sse_lines(&lines)
                }
                Some(Err(e)) => vec![Err(e)],
                None => {
                    let tail = std::mem::take(buffer);
                    let tail = tail.trim_end_matches('\r').to_string();
                    if tail.is_empty() {
                        Vec::new()
                    } else {
                        parse_sse_lines(&[tail])
                    }
                }
            };
            futures::future::ready(Some(results))
        })
        .flat_map(stream::iter);

    Box::pin(stream)
}

/// Parses complete SSE lines into reply chunks.
fn parse_sse_lines(lines: &[String]) -> Vec<Result<ReplyChunk, InterpreterError>> {
    let mut results = Vec::new();

    for line in lines {
        let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
            continue;
        };

        if data == "[DONE]" || data.is_empty() {
            continue;
        }

        match serde_json::from_str::<WireStreamChunk>(data) {
            Ok(chunk) => {
                if let Some(choice) = chunk.choices.first() {
                    if let Some(ref content) = choice.delta.content {
                        if !content.is_empty() {
                            results.push(Ok(ReplyChunk::content(content)));
                        }
                    }

                    if let Some(ref reason) = choice.finish_reason {
                        let finish = match reason.as_str() {
                            "stop" => FinishReason::Stop,
                            "length" => FinishReason::Length,
                            "content_filter" => FinishReason::ContentFilter,
                            _ => FinishReason::Stop,
                        };
                        results.push(Ok(ReplyChunk::finished(finish)));
                    }
                }
            }
            Err(e) => {
                results.push(Err(InterpreterError::parse(format!(
                    "Failed to parse SSE chunk: {}",
                    e
                ))));
            }
        }
    }

    results
}

/// Parses retry-after from an error response body.
fn parse_retry_after(error_body: &str) -> u32 {
    // OpenAI sometimes includes "try again in Xs" in the error message
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
        if let Some(msg) = parsed.get("error").and_then(|e| e.get("message")) {
            if let Some(s) = msg.as_str() {
                if let Some(idx) = s.find("try again in ") {
                    let rest = &s[idx + 13..];
                    if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                        if let Ok(secs) = rest[..num_end].parse::<u32>() {
                            return secs;
                        }
                    }
                }
            }
        }
    }
    30
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    delta: WireStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WireStreamDelta {
    content: Option<String>,
}
