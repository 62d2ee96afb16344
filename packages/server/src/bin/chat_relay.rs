// Entry point for the interview-coach chat relay

use std::sync::Arc;

use anyhow::{Context, Result};
use openai_client::OpenAIClient;
use spark_core::domains::chat::PromptTemplate;
use spark_core::kernel::ChatRelayDeps;
use spark_core::{server::build_chat_app, ChatRelayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spark_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChatRelayConfig::from_env().context("Failed to load configuration")?;
    let prompt = PromptTemplate::load(config.prompt_path.as_deref())?;
    if let Some(path) = &config.prompt_path {
        tracing::info!(path = %path, "Using prompt template override");
    }

    let deps = ChatRelayDeps::new(Arc::new(OpenAIClient::new(config.openai_api_key.clone())))
        .with_prompt(prompt)
        .with_models(&config.chat_model, &config.tts_model, &config.tts_voice);

    let app = build_chat_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("AI server running on port {}", config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
