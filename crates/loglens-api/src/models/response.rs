use axum::{http::StatusCode, Json};
use loglens_analyzer::{AnalyzeError, ErrorKind};
use serde::{Deserialize, Serialize};

/// JSON error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (status, Json(Self {
            detail: message.into(),
        }))
    }

    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    // Non-UTF-8 uploads are the caller's fault; everything else is ours
    pub fn from_analyze_error(e: &AnalyzeError) -> (StatusCode, Json<Self>) {
        match e.kind() {
            ErrorKind::InvalidInput => {
                Self::bad_request("Invalid file. Please upload a UTF-8 encoded text log file.")
            }
            ErrorKind::Configuration => Self::internal(format!("Server configuration error: {}", e)),
            ErrorKind::UpstreamCall | ErrorKind::UpstreamFormat => {
                Self::internal(format!("Error during AI analysis: {}", e))
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
