//! Report command: build one report now and write it as CSV

use super::shared::{create_spinner, load_configuration, setup_logging};
use crate::app::models::MetricsRow;
use crate::app::services::report_builder::Report;
use crate::app::services::report_service::ReportService;
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Default file name when `--output` is not given
const DEFAULT_REPORT_FILE: &str = "report.csv";

/// Stores listed in the human summary
const SUMMARY_ROWS: usize = 10;

/// Run the report command
pub async fn run_report(args: ReportArgs) -> Result<()> {
    setup_logging(&args)?;
    args.validate()?;

    let config = report_configuration(&args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.report.output_dir.join(DEFAULT_REPORT_FILE));
    let service = ReportService::from_config(&config)?;

    info!(
        "Generating report from {} into {}",
        service.source_description(),
        output.display()
    );

    let spinner = args
        .show_progress()
        .then(|| create_spinner("Building uptime report..."));
    let started = Instant::now();

    let worker_output = output.clone();
    let outcome = tokio::task::spawn_blocking(move || service.generate_to(&worker_output))
        .await
        .map_err(|e| Error::report_generation(format!("report worker did not finish: {}", e)))?;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let (report, artifact) = outcome?;

    match args.format {
        OutputFormat::Human => print_human_summary(&report, &artifact.path, started.elapsed()),
        OutputFormat::Json => print_json_rows(&report.rows),
        OutputFormat::Csv => print_csv_rows(&report.rows),
    }
}

/// Layered configuration with the report flags applied last
pub fn report_configuration(args: &ReportArgs) -> Result<Config> {
    let config = load_configuration(args, args.data_dir.clone(), None)?;
    apply_report_flags(config, args)
}

/// Apply the reference-instant flags on top of a loaded configuration
fn apply_report_flags(mut config: Config, args: &ReportArgs) -> Result<Config> {
    if let Some(reference) = args.reference() {
        config.report.reference = reference;
    }

    config.validate()?;
    Ok(config)
}

fn print_human_summary(report: &Report, path: &Path, elapsed: Duration) -> Result<()> {
    println!();
    println!("{}", "Store uptime report".bold().green());
    println!("{}", "━".repeat(41));
    println!("   • Reference instant: {}", report.reference.to_rfc3339().cyan());
    println!("   • Stores: {}", report.stats.stores_processed);
    println!(
        "   • Observations in week window: {} ({} outside business hours)",
        report.stats.observations_considered, report.stats.observations_skipped_closed
    );
    if report.stats.observations_unknown_store > 0 {
        println!(
            "   • {} observations for unknown stores ignored",
            report.stats.observations_unknown_store.to_string().yellow()
        );
    }
    if report.stats.stores_without_observations > 0 {
        println!(
            "   • {} stores had no observations",
            report.stats.stores_without_observations.to_string().yellow()
        );
    }
    println!("   • Time: {}", HumanDuration(elapsed));
    println!("   • Written to: {}", path.display().to_string().bold());

    if !report.rows.is_empty() {
        println!();
        println!(
            "   {:<38} {:>8} {:>8} {:>8} {:>8}",
            "store_id".dimmed(),
            "up 1h".dimmed(),
            "down 1h".dimmed(),
            "up 1d".dimmed(),
            "down 1d".dimmed()
        );
        for row in report.rows.iter().take(SUMMARY_ROWS) {
            println!(
                "   {:<38} {:>8} {:>8} {:>8.2} {:>8.2}",
                row.store_id,
                row.uptime_last_hour,
                row.downtime_last_hour,
                row.uptime_last_day,
                row.downtime_last_day
            );
        }
        if report.rows.len() > SUMMARY_ROWS {
            println!("   ... and {} more", report.rows.len() - SUMMARY_ROWS);
        }
    }

    println!();
    Ok(())
}

fn print_json_rows(rows: &[MetricsRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| Error::report_generation(format!("Failed to encode rows as JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn print_csv_rows(rows: &[MetricsRow]) -> Result<()> {
    crate::app::adapters::report_writer::write_rows(std::io::stdout().lock(), rows)
}
