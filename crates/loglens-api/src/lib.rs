//! LogLens HTTP API
//! Upload a log file, get back a structured analysis report.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers::{analyze_log, health, root};
use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn router(state: Arc<AppState>, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_log))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
