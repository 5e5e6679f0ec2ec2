// PodBot Chat API
// Binary entry point: load config, wire components, serve HTTP.

use std::sync::Arc;

use podbot_api::chat::ChatService;
use podbot_api::config::Config;
use podbot_api::llm::openai::OpenAiProvider;
use podbot_api::memory::MemoryClient;
use podbot_api::server::{self, AppState};
use podbot_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.log_level);

    tracing::info!("PodBot Chat API v{}", env!("CARGO_PKG_VERSION"));

    let memory = MemoryClient::new(config.memory.base_url.clone());
    let provider = Arc::new(OpenAiProvider::new(config.model.clone()));
    let chat = Arc::new(ChatService::new(
        memory,
        provider,
        config.memory.context_window_max,
    ));

    let router = server::build_router(AppState { chat });
    server::serve(router, config.server.port).await
}
