//! Shared components for CLI commands
//!
//! Logging setup and layered configuration loading used by every command.

use crate::cli::args::CommonArgs;
use crate::config::Config;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`/`-q`.
pub fn setup_logging(args: &impl CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("store_monitor={}", log_level)));

    if args.quiet() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
///
/// Falls back to the default config file location when `--config` is absent
/// and that file exists. Validation is left to the caller, after its own
/// overrides.
pub fn load_configuration(
    args: &impl CommonArgs,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<Config> {
    let default_config_path = if args.config_file().is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match args.config_file() {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    Config::load_layered(data_dir, output_dir, config_file)
}

/// Spinner for work of unknown length
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
