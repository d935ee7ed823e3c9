//! Gemini Relay server
//!
//! Serves the chat page and relays conversations to the upstream model API while
//! keeping the credential on the server.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_relay::config::{Config, PromptTemplate};
use gemini_relay::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // No credential, no server
    let config = Config::from_env().inspect_err(|e| tracing::error!("{}", e))?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let system_instruction = match &config.system_prompt_file {
        Some(path) => {
            let template = PromptTemplate::load_from_file(path).await?;
            tracing::info!("🎭 Using persona '{}'", template.persona.name);
            Some(template.instruction().to_string())
        }
        None => None,
    };

    let state = AppState::from_config(&config, system_instruction)?;
    let app = gemini_relay::app(state, &config.static_dir);

    tracing::info!(
        backend = ?config.backend,
        model = %config.model_id,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Upstream configured"
    );
    tracing::info!("🔥 Relay running at http://{}", addr);
    tracing::info!("   Chat page served from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
