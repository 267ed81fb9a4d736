mod audit;
mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::estimate::EstimateArgs;
use commands::value::ValueArgs;

/// Monte Carlo portfolio stress-risk estimation
#[derive(Parser)]
#[command(
    name = "srisk",
    version,
    about = "Monte Carlo portfolio stress-risk estimation",
    long_about = "Estimates worst-case portfolio loss over a short stress horizon by \
                  simulating many independent stochastic price-stress paths against an \
                  isolated market clone per path."
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
    /// Run the Monte Carlo stress-risk estimate
    Estimate(EstimateArgs),
    /// Mark-to-market valuation of a portfolio against a market
    Value(ValueArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Estimate(args) => commands::estimate::run_estimate(args),
        Commands::Value(args) => commands::value::run_value(args),
        Commands::Version => {
            println!("srisk {}", env!("CARGO_PKG_VERSION"));
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
