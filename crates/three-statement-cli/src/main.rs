mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::ratios::RatiosArgs;
use commands::three_statement::ProjectArgs;

/// Linked three-statement financial projections
#[derive(Parser)]
#[command(
    name = "tsm",
    version,
    about = "Linked three-statement financial projections",
    long_about = "Projects an income statement, cash flow statement and balance sheet \
                  period by period from a single set of assumptions, sweeping cash \
                  against a revolving credit facility, with decimal precision. \
                  Assumptions come from a JSON or YAML file, piped JSON, or flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the three statements over the forecast horizon
    Project(ProjectArgs),
    /// Project, then compute per-period financial ratios
    Ratios(RatiosArgs),
    /// Print a sample assumptions file
    Sample,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::three_statement::run_project(args),
        Commands::Ratios(args) => commands::ratios::run_ratios(args),
        Commands::Sample => commands::three_statement::run_sample(),
        Commands::Version => {
            println!("tsm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
