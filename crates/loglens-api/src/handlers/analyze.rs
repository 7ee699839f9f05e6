use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use loglens_core::AnalysisReport;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::models::{AnalyzeUpload, ApiError};
use crate::state::AppState;

// Handler: POST /api/analyze (multipart: file, query)
pub async fn analyze_log(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e.body_text(), "Rejected non-multipart upload");
        ApiError::new(e.status(), e.body_text())
    })?;
    let upload = AnalyzeUpload::from_multipart(&mut multipart)
        .await
        .inspect_err(|(status, body)| warn!(%status, detail = %body.detail, "Rejected upload form"))?;

    info!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        query = %upload.query,
        "ANALYZE request"
    );

    match state.analyzer.analyze(&upload.bytes, Some(&upload.query)).await {
        Ok(report) => {
            info!(
                filename = %upload.filename,
                anomalies = report.anomalies.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Analysis returned"
            );
            Ok(Json(report))
        }
        Err(e) if e.is_client_error() => {
            warn!(filename = %upload.filename, query = %upload.query, error = %e, "Rejected upload");
            Err(ApiError::from_analyze_error(&e))
        }
        Err(e) => {
            error!(
                filename = %upload.filename,
                query = %upload.query,
                kind = ?e.kind(),
                error = %e,
                "Analysis failed"
            );
            Err(ApiError::from_analyze_error(&e))
        }
    }
}
