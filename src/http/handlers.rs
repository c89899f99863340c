//! HTTP handlers for the report API.
//!
//! Each handler delegates to the report service; none of them blocks on
//! report generation.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::dto::{GetReportQuery, HealthResponse, ReportStatusResponse, TriggerReportResponse};
use super::error::AppError;
use super::state::AppState;
use crate::app::services::job_registry::{JobId, JobStatus, ReportPoll};
use crate::constants::REPORT_FILE_EXTENSION;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /trigger_report
///
/// Start a report job and return its identifier immediately.
pub async fn trigger_report(State(state): State<AppState>) -> HandlerResult<TriggerReportResponse> {
    let report_id = state.service.trigger();
    Ok(Json(TriggerReportResponse {
        report_id: report_id.to_string(),
    }))
}

/// GET /get_report?report_id=<id>
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<GetReportQuery>,
) -> Result<Response, AppError> {
    let report_id = query
        .report_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing report_id query parameter".to_string()))?;

    report_response(&state, JobId::from(report_id.trim())).await
}

/// GET /get_report/{report_id}
pub async fn get_report_by_id(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Response, AppError> {
    report_response(&state, JobId::from(report_id)).await
}

/// Status JSON while running or failed, the CSV file once complete
async fn report_response(state: &AppState, report_id: JobId) -> Result<Response, AppError> {
    match state.service.poll(&report_id) {
        ReportPoll::NotFound => {
            debug!("Poll for unknown report {}", report_id);
            Err(AppError::NotFound("Report not found".to_string()))
        }
        ReportPoll::Running => Ok(status_response(JobStatus::Running)),
        ReportPoll::Failed => Ok(status_response(JobStatus::Failed)),
        ReportPoll::Complete(path) => {
            let body = tokio::fs::read(&path).await.map_err(|e| {
                AppError::Internal(format!(
                    "Failed to read report file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

            let disposition = format!(
                "attachment; filename=\"{}.{}\"",
                report_id, REPORT_FILE_EXTENSION
            );
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
    }
}

fn status_response(status: JobStatus) -> Response {
    Json(ReportStatusResponse { status }).into_response()
}
