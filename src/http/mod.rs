//! HTTP transport for report jobs
//!
//! An axum router exposing the trigger/poll operations of [`ReportService`]:
//!
//! - `POST /trigger_report` starts a job and returns `{"report_id": ...}`
//! - `GET /get_report?report_id=...` (or `/get_report/{report_id}`) returns the
//!   job status while it is running or failed, the CSV once complete, and 404
//!   for unknown identifiers
//! - `GET /health` is a liveness check
//!
//! [`ReportService`]: crate::app::services::report_service::ReportService

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
