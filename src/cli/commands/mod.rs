//! Command implementations for the store monitor CLI
//!
//! Each subcommand lives in its own module:
//! - `serve`: run the HTTP trigger/poll API
//! - `report`: build one report synchronously and write it as CSV

pub mod report;
pub mod serve;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Serve(serve_args)) => serve::run_serve(serve_args).await,
        Some(Commands::Report(report_args)) => report::run_report(report_args).await,
        None => Err(crate::Error::configuration(
            "No command given; run with --help to see available commands",
        )),
    }
}
