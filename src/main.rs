use clap::Parser;
use std::process;
use store_monitor::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<()> = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result.map_err(anyhow::Error::from),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down...");
                    Ok(())
                }
                Err(e) => Err(anyhow::Error::from(e).context("Failed to listen for CTRL+C")),
            },
        }
    });

    // Blocking report workers are not awaited past this point
    runtime.shutdown_background();

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Store Monitor - Business-hours uptime reports");
    println!("=============================================");
    println!();
    println!("Estimate, for every store, how long it was up or down during the last");
    println!("hour, day and week, counting only status polls inside business hours.");
    println!();
    println!("USAGE:");
    println!("    store-monitor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    serve       Serve the trigger/poll report API over HTTP");
    println!("    report      Generate one report now and write it as CSV");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Serve reports from ./data on port 8000:");
    println!("    store-monitor serve --data-dir data");
    println!();
    println!("    # Trigger and fetch a report:");
    println!("    curl -X POST http://localhost:8000/trigger_report");
    println!("    curl -OJ 'http://localhost:8000/get_report?report_id=<id>'");
    println!();
    println!("    # Historical dataset, windows ending at the latest poll:");
    println!("    store-monitor report --data-dir data --latest-observation --output out.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    store-monitor <COMMAND> --help");
}
