//! Router configuration for the HTTP API.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/trigger_report", post(handlers::trigger_report))
        .route("/get_report", get(handlers::get_report))
        .route("/get_report/{report_id}", get(handlers::get_report_by_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::adapters::report_writer::ReportWriter;
    use crate::app::models::ReferenceInstant;
    use crate::app::services::report_builder::ReportBuilder;
    use crate::app::services::report_service::{InMemoryDataSource, ReportService};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let service = ReportService::new(
            Arc::new(InMemoryDataSource::default()),
            ReportBuilder::default(),
            ReportWriter::new("reports"),
            ReferenceInstant::Now,
        );
        let _router = create_router(AppState::new(service));
    }
}
