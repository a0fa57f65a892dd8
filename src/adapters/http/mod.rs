//! HTTP adapters - the gateway's REST surface.

pub mod chat;

pub use chat::{chat_router, ChatAppState};

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Assembles the full application router: chat routes plus trace and CORS
/// layers.
pub fn build_router(state: ChatAppState, server: &ServerConfig) -> Router {
    chat_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
}

/// Builds the CORS layer.
///
/// With no configured origins every origin is allowed, matching the
/// gateway's open-by-default contract; a configured comma-separated list
/// restricts it.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_builds_with_no_origins() {
        let _layer = cors_layer(&ServerConfig::default());
    }

    #[test]
    fn cors_layer_builds_with_origin_list() {
        let config = ServerConfig {
            cors_origins: Some("http://localhost:5173,not a url".to_string()),
            ..Default::default()
        };
        let _layer = cors_layer(&config);
    }
}
