//! HTTP handlers for the chat endpoint.
//!
//! Connects the axum route to the application-layer `ChatService` and maps
//! pipeline errors onto the gateway's status codes.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{ChatError, ChatService};

use super::dto::{ChatRequestBody, ChatResponseBody, ErrorBody};

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub chat: Arc<ChatService>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }
}

/// POST /chat - Send a message and receive the full aggregated reply.
///
/// # Errors
/// - 400 Bad Request: `message` missing, `null`, or empty; the interpreter
///   is not invoked
/// - 500 Internal Server Error: the interpreter failed while starting or
///   streaming the reply
pub async fn post_chat(
    State(state): State<ChatAppState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<impl IntoResponse, ChatApiError> {
    let reply = state.chat.send_message(body.message_text()).await?;

    Ok((StatusCode::OK, Json(ChatResponseBody { response: reply })))
}

/// API error type that converts pipeline errors to HTTP responses.
#[derive(Debug)]
pub enum ChatApiError {
    /// Missing or empty message.
    MissingMessage,
    /// Interpreter failure; the display text goes into the response body.
    Upstream(String),
}

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => ChatApiError::MissingMessage,
            ChatError::Interpreter(e) => ChatApiError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ChatApiError::MissingMessage => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Message is required"),
            ),
            ChatApiError::Upstream(msg) => {
                tracing::error!(error = %msg, "chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(msg))
            }
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::InterpreterError;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_message_maps_to_400() {
        let response = ChatApiError::MissingMessage.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Message is required");
    }

    #[tokio::test]
    async fn upstream_error_maps_to_500_with_error_text() {
        let err: ChatApiError =
            ChatError::Interpreter(InterpreterError::network("connection reset")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "network error: connection reset");
    }

    #[tokio::test]
    async fn empty_message_error_converts_to_missing_message() {
        let err: ChatApiError = ChatError::EmptyMessage.into();
        assert!(matches!(err, ChatApiError::MissingMessage));
    }
}
