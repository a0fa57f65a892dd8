//! HTTP DTOs for the chat endpoint.
//!
//! These types pin down the gateway's wire contract:
//! `{"message"}` in, `{"response"}` or `{"error"}` out.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestBody {
    /// The user message. Absent and `null` are treated the same as empty.
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequestBody {
    /// The message text, with absent/null normalized to empty.
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Success body for `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponseBody {
    /// The full aggregated reply text.
    pub response: String,
}

/// Error body for `POST /chat` failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable error description.
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_deserializes_message() {
        let body: ChatRequestBody = serde_json::from_value(json!({"message": "hello"})).unwrap();
        assert_eq!(body.message_text(), "hello");
    }

    #[test]
    fn request_body_tolerates_absent_message() {
        let body: ChatRequestBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.message_text(), "");
    }

    #[test]
    fn request_body_tolerates_null_message() {
        let body: ChatRequestBody = serde_json::from_value(json!({"message": null})).unwrap();
        assert_eq!(body.message_text(), "");
    }

    #[test]
    fn response_body_has_response_field() {
        let json = serde_json::to_value(ChatResponseBody {
            response: "Hi there".to_string(),
        })
        .unwrap();
        assert_eq!(json, json!({"response": "Hi there"}));
    }

    #[test]
    fn error_body_has_error_field() {
        let json = serde_json::to_value(ErrorBody::new("Message is required")).unwrap();
        assert_eq!(json, json!({"error": "Message is required"}));
    }
}
