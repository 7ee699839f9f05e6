use loglens_analyzer::Analyzer;
use loglens_api::{config::AppConfig, router, state::AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "loglens_api=info,loglens_analyzer=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    //logging setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Setup analyzer
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        max_lines = config.llm.max_lines,
        timeout_secs = config.llm.timeout.as_secs(),
        "Setting up analyzer..."
    );
    let analyzer = Analyzer::from_config(&config.llm);

    // missing credential is reported per request, not fatal here
    if config.llm.api_key.is_none() {
        if let Some(var) = config.llm.provider.api_key_var() {
            warn!("{} is not set; /api/analyze will fail until it is", var);
        }
    }

    info!(origins = ?config.cors_origins, "CORS allow-list");

    let state = Arc::new(AppState::new(analyzer));
    let app = router(state, &config);

    // Server start
    info!("Starting server on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
