//! Serve command: the HTTP trigger/poll API

use super::shared::{load_configuration, setup_logging};
use crate::app::services::report_service::ReportService;
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::http::{AppState, create_router};
use crate::{Error, Result};
use tracing::info;

/// Run the serve command until the server stops or the task is cancelled
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    setup_logging(&args)?;
    args.validate()?;

    let config = serve_configuration(&args)?;
    config.ensure_output_directory()?;

    let service = ReportService::from_config(&config)?;
    info!("Serving reports from {}", service.source_description());

    let app = create_router(AppState::new(service));
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| Error::io(format!("Failed to bind {}", address), e))?;

    info!("Listening on http://{}", address);
    eprintln!("Store monitor listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::io("HTTP server stopped unexpectedly", e))
}

/// Layered configuration with the serve flags applied last
pub fn serve_configuration(args: &ServeArgs) -> Result<Config> {
    let mut config = load_configuration(args, args.data_dir.clone(), args.output_dir.clone())?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}
