use clap::Args;
use colored::Colorize;
use serde_json::Value;

use stress_risk_core::engine::{self, StressRiskInput};
use stress_risk_core::portfolio::DEFAULT_CAPITAL;

use crate::audit::StderrAudit;
use crate::input;

/// Arguments for the Monte Carlo stress-risk estimate
#[derive(Args)]
pub struct EstimateArgs {
    /// Path to a JSON input file (full StressRiskInput document)
    #[arg(long)]
    pub input: Option<String>,

    /// Inline market universe as comma-separated SYM=PRICE pairs
    /// (e.g. "AAPL=185,GOOG=135,TSLA=240")
    #[arg(long, value_delimiter = ',')]
    pub market: Option<Vec<String>>,

    /// Inline holdings as comma-separated SYM=QTY pairs
    /// (e.g. "AAPL=50,GOOG=10,TSLA=20")
    #[arg(long, value_delimiter = ',')]
    pub holdings: Option<Vec<String>>,

    /// Number of independent simulation paths
    #[arg(long, default_value_t = 200)]
    pub simulations: u32,

    /// Per-step shock volatility (e.g. 0.05)
    #[arg(long, default_value_t = 0.05)]
    pub volatility: f64,

    /// Stress steps applied within each path
    #[arg(long, default_value_t = 10)]
    pub steps_per_path: u32,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reference capital figure for inline portfolios
    #[arg(long, default_value_t = DEFAULT_CAPITAL)]
    pub capital: f64,

    /// Risk percentage above which the verdict banner reports high risk
    #[arg(long, default_value_t = 15.0)]
    pub threshold: f64,
}

pub fn run_estimate(args: EstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let risk_input = resolve_input(&args)?;
    let result = engine::estimate_risk_with_audit(&risk_input, &StderrAudit)?;

    // Host-side verdict, kept off stdout so piped output stays parseable
    if result.result.risk_pct > args.threshold {
        eprintln!("{}", "High Risk!".red().bold());
    } else {
        eprintln!("{}", "Risk Acceptable".green());
    }

    Ok(serde_json::to_value(result)?)
}

fn resolve_input(args: &EstimateArgs) -> Result<StressRiskInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(doc) = input::stdin::read_stdin()? {
        return Ok(doc);
    }

    match (&args.market, &args.holdings) {
        (Some(market_pairs), Some(holding_pairs)) => Ok(StressRiskInput {
            portfolio: input::inline::parse_portfolio(holding_pairs, args.capital)?,
            market: input::inline::parse_market(market_pairs)?,
            simulations: args.simulations,
            volatility: args.volatility,
            steps_per_path: args.steps_per_path,
            seed: args.seed,
        }),
        _ => Err(
            "--input <file.json>, piped stdin, or both --market and --holdings are required"
                .into(),
        ),
    }
}
