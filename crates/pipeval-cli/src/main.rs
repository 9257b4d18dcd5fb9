//! # pipeval CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipeval_cli::help::{run_help, HelpArgs};
use pipeval_cli::samplesheet::{run_samplesheet, SamplesheetArgs};
use pipeval_cli::summary::{run_summary, SummaryArgs};
use pipeval_cli::validate::{run_validate, ValidateArgs};

/// Pipeline parameter validation, help and summaries driven by a JSON
/// Schema parameter contract.
#[derive(Parser, Debug)]
#[command(name = "pipeval", version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile and validate pipeline parameters against the schema.
    Validate(ValidateArgs),

    /// Render the pipeline help screen.
    Help(HelpArgs),

    /// Summarize parameters that differ from their schema defaults.
    Summary(SummaryArgs),

    /// Stream the records of a samplesheet parameter as JSON lines.
    Samplesheet(SamplesheetArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("pipeval CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Help(args) => run_help(&args),
        Commands::Summary(args) => run_summary(&args),
        Commands::Samplesheet(args) => run_samplesheet(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
