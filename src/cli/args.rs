//! Command-line argument definitions for the store monitor
//!
//! This module defines the CLI interface using the clap derive API: a `serve`
//! command running the HTTP API and a `report` command producing one report
//! directly.

use crate::app::models::ReferenceInstant;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the store monitor
///
/// Estimates per-store uptime and downtime within business hours from sparse
/// status polls.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "store-monitor",
    version,
    about = "Estimate store uptime and downtime within business hours from status polls",
    long_about = "Reads store, business-hours and status-poll tables and estimates, for every store, \
                  how long it was up or down during the last hour, day and week, counting only \
                  polls inside the store's local business hours. Reports are served over HTTP as \
                  background jobs or generated directly from the command line."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Serve the trigger/poll report API over HTTP
    Serve(ServeArgs),
    /// Generate one report now and write it as CSV
    Report(ReportArgs),
}

/// Arguments for the serve command
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/store-monitor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Host address to bind
    #[arg(long = "host", value_name = "HOST", help = "Host address to bind")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long = "port", value_name = "PORT", help = "Port to listen on")]
    pub port: Option<u16>,

    /// Directory containing stores.csv, business_hours.csv and store_status.csv
    #[arg(
        short = 'd',
        long = "data-dir",
        value_name = "DIR",
        help = "Directory containing the three input CSV tables"
    )]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving <report_id>.csv files
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory receiving generated reports"
    )]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress all output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format for the report command summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary on the terminal
    #[default]
    Human,
    /// Rows as JSON on stdout
    Json,
    /// Rows as CSV on stdout
    Csv,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory containing the input tables
    #[arg(
        short = 'd',
        long = "data-dir",
        value_name = "DIR",
        help = "Directory containing the three input CSV tables"
    )]
    pub data_dir: Option<PathBuf>,

    /// Report file to write
    ///
    /// Defaults to <output_dir>/report.csv
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Report file to write"
    )]
    pub output: Option<PathBuf>,

    /// Pin the reference instant (RFC 3339, e.g. 2023-01-25T18:13:22Z)
    #[arg(
        long = "reference-time",
        value_name = "RFC3339",
        help = "Compute windows ending at this instant instead of now",
        conflicts_with = "latest_observation"
    )]
    pub reference_time: Option<DateTime<Utc>>,

    /// Use the latest status observation as the reference instant
    #[arg(
        long = "latest-observation",
        help = "Compute windows ending at the latest status observation"
    )]
    pub latest_observation: bool,

    /// Summary format
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Human,
        help = "Summary format"
    )]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress all output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Common view over the logging and config flags of every command
pub trait CommonArgs {
    fn config_file(&self) -> Option<&PathBuf>;
    fn verbose(&self) -> u8;
    fn quiet(&self) -> bool;

    /// Get the logging level based on verbosity
    fn get_log_level(&self) -> &'static str {
        if self.quiet() {
            "error"
        } else {
            match self.verbose() {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl CommonArgs for ServeArgs {
    fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    fn verbose(&self) -> u8 {
        self.verbose
    }

    fn quiet(&self) -> bool {
        self.quiet
    }
}

impl CommonArgs for ReportArgs {
    fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    fn verbose(&self) -> u8 {
        self.verbose
    }

    fn quiet(&self) -> bool {
        self.quiet
    }
}

impl ServeArgs {
    /// Validate the serve command arguments
    pub fn validate(&self) -> Result<()> {
        validate_config_file(self.config_file.as_ref())?;
        validate_data_dir(self.data_dir.as_ref())?;

        if self.port == Some(0) {
            return Err(Error::configuration("Port must be greater than 0"));
        }

        Ok(())
    }
}

impl ReportArgs {
    /// Validate the report command arguments
    pub fn validate(&self) -> Result<()> {
        validate_config_file(self.config_file.as_ref())?;
        validate_data_dir(self.data_dir.as_ref())?;

        if let Some(output) = &self.output {
            if output.is_dir() {
                return Err(Error::configuration(format!(
                    "Output must be a file path, not a directory: {}",
                    output.display()
                )));
            }
        }

        Ok(())
    }

    /// Reference instant chosen on the command line, if any
    pub fn reference(&self) -> Option<ReferenceInstant> {
        match (self.reference_time, self.latest_observation) {
            (Some(instant), _) => Some(ReferenceInstant::Fixed(instant)),
            (None, true) => Some(ReferenceInstant::LatestObservation),
            (None, false) => None,
        }
    }

    /// Check if we should show progress and colored output
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human
    }
}

fn validate_config_file(config_file: Option<&PathBuf>) -> Result<()> {
    if let Some(config_file) = config_file {
        if !config_file.exists() {
            return Err(Error::configuration(format!(
                "Configuration file does not exist: {}",
                config_file.display()
            )));
        }
    }
    Ok(())
}

fn validate_data_dir(data_dir: Option<&PathBuf>) -> Result<()> {
    if let Some(data_dir) = data_dir {
        if !data_dir.is_dir() {
            return Err(Error::configuration(format!(
                "Data directory does not exist: {}",
                data_dir.display()
            )));
        }
    }
    Ok(())
}
