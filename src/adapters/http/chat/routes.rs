//! Axum routes for the chat endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_chat, ChatAppState};

/// Creates the gateway's routing table.
///
/// Endpoints:
/// - POST /chat - Send a message, receive the aggregated reply
///
/// No other routes or methods are defined.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().route("/chat", post(post_chat))
}
