//! Main Entrypoint for the Bolo API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging and the collaborator clients.
//! 3. Spawning the idle-session sweep task.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use bolo_api::{
    config::{Config, Provider},
    router::create_router,
    state::AppState,
};
use bolo_core::{
    engine::{CallPolicy, ConversationEngine},
    llm::{LlmClient, OpenAiCompatibleClient},
    registry::SessionRegistry,
    speech::{GoogleSpeechClient, GoogleTtsClient},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// How often the registry is swept for idle sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Collaborator Clients ---
    let llm: Arc<dyn LlmClient> = match &config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY missing after validation")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base("https://api.openai.com/v1/");
            Arc::new(OpenAiCompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
        Provider::Gemini => {
            info!("Using Gemini provider.");
            let api_key = config
                .gemini_api_key
                .as_ref()
                .context("GEMINI_API_KEY missing after validation")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai");
            Arc::new(OpenAiCompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
    };

    let stt = Arc::new(GoogleSpeechClient::new(
        config.google_api_key.clone(),
        config.llm_timeout,
    ));
    let tts = Arc::new(GoogleTtsClient::new(
        config.google_api_key.clone(),
        config.llm_timeout,
    ));

    let engine = Arc::new(ConversationEngine::new(
        Arc::clone(&llm),
        CallPolicy {
            timeout: config.llm_timeout,
            ..CallPolicy::default()
        },
    ));

    let registry = Arc::new(SessionRegistry::new());

    // --- 4. Spawn the Idle-Session Sweep ---
    {
        let registry = Arc::clone(&registry);
        let ttl = config.session_ttl;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let evicted = registry.evict_idle(ttl).await;
                if evicted > 0 {
                    let remaining = registry.len().await;
                    info!(evicted, remaining, "idle session sweep");
                }
            }
        });
    }

    let app_state = Arc::new(AppState {
        registry,
        engine,
        llm,
        stt,
        tts,
        config: Arc::new(config.clone()),
    });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
