use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stress_risk_core::market::Market;
use stress_risk_core::portfolio::{Portfolio, DEFAULT_CAPITAL};
use stress_risk_core::valuation;

use crate::input;

/// Arguments for mark-to-market valuation
#[derive(Args)]
pub struct ValueArgs {
    /// Path to a JSON input file with "market" and "portfolio" sections
    #[arg(long)]
    pub input: Option<String>,

    /// Inline market universe as comma-separated SYM=PRICE pairs
    #[arg(long, value_delimiter = ',')]
    pub market: Option<Vec<String>>,

    /// Inline holdings as comma-separated SYM=QTY pairs
    #[arg(long, value_delimiter = ',')]
    pub holdings: Option<Vec<String>>,

    /// Reference capital figure for inline portfolios
    #[arg(long, default_value_t = DEFAULT_CAPITAL)]
    pub capital: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ValuationDocument {
    portfolio: Portfolio,
    market: Market,
}

#[derive(Debug, Serialize)]
struct ValuationOutput {
    value: f64,
    positions: usize,
    instruments: usize,
    capital: f64,
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = resolve_input(&args)?;
    let value = valuation::portfolio_value(&doc.portfolio, &doc.market)?;

    let output = ValuationOutput {
        value,
        positions: doc.portfolio.len(),
        instruments: doc.market.len(),
        capital: doc.portfolio.capital(),
    };
    Ok(serde_json::to_value(output)?)
}

fn resolve_input(args: &ValueArgs) -> Result<ValuationDocument, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(doc) = input::stdin::read_stdin()? {
        return Ok(doc);
    }

    match (&args.market, &args.holdings) {
        (Some(market_pairs), Some(holding_pairs)) => Ok(ValuationDocument {
            portfolio: input::inline::parse_portfolio(holding_pairs, args.capital)?,
            market: input::inline::parse_market(market_pairs)?,
        }),
        _ => Err(
            "--input <file.json>, piped stdin, or both --market and --holdings are required"
                .into(),
        ),
    }
}
