//! Chat gateway binary: config, logging, and server wiring.

use std::sync::Arc;

use chat_gateway::adapters::ai::{OpenAiConfig, OpenAiInterpreter};
use chat_gateway::adapters::http::{build_router, ChatAppState};
use chat_gateway::application::ChatService;
use chat_gateway::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let interpreter = OpenAiInterpreter::new(OpenAiConfig::from(&config.ai))?;
    let mut service = ChatService::new(Arc::new(interpreter));
    if let Some(ref prompt) = config.ai.system_prompt {
        service = service.with_system_prompt(prompt.clone());
    }
    let state = ChatAppState::new(Arc::new(service));
    let app = build_router(state, &config.server);

    let addr = config
        .server
        .socket_addr()
        .ok_or("invalid server bind address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        model = %config.ai.model,
        base_url = %config.ai.base_url,
        offline = config.ai.offline,
        "chat gateway listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
