use std::sync::Arc;

use proofchain::config::{database, Settings};
use proofchain::services::{llm::LlmClient, stt::SttClient};
use proofchain::{app, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(database = %settings.mongodb_database, "connecting to MongoDB");
    let db = database::connect(&settings).await?;

    let llm = LlmClient::new(&settings)?;
    let stt = SttClient::new(&settings)?;
    if settings.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set, AI flows will fail");
    }
    info!(model = %llm.default_model(), "model backend ready");

    let bind_address = settings.bind_address;
    let state = AppState::new(db, settings, Arc::new(llm), Arc::new(stt));
    state.voice_sessions.spawn_sweeper(state.settings.voice_session_ttl);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!(address = %bind_address, "proofchain listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
