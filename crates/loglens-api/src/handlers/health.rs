use axum::Json;

use crate::models::HealthResponse;

pub const HEALTH_MESSAGE: &str = "AI Log Analyzer backend is running!";

// Handler: GET /
// liveness only; never touches the analyzer or its credential
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: HEALTH_MESSAGE.to_string(),
    })
}

// Handler: GET /health
pub async fn health() -> &'static str {
    "ok"
}
