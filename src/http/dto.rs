//! Request and response bodies for the HTTP API.

use crate::app::services::job_registry::JobStatus;
use serde::{Deserialize, Serialize};

/// Response to `POST /trigger_report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerReportResponse {
    pub report_id: String,
}

/// Query string of `GET /get_report`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetReportQuery {
    pub report_id: Option<String>,
}

/// Body returned while a report is not downloadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusResponse {
    pub status: JobStatus,
}

/// Response to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
