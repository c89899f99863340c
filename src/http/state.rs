//! Application state for the HTTP server.

use crate::app::services::report_service::ReportService;

/// Shared application state passed to all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Report jobs; clones share one registry
    pub service: ReportService,
}

impl AppState {
    pub fn new(service: ReportService) -> Self {
        Self { service }
    }
}
