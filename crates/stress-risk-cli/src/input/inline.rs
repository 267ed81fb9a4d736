use std::collections::BTreeMap;

use stress_risk_core::market::{Instrument, Market};
use stress_risk_core::portfolio::Portfolio;

/// Parse `SYM=PRICE` pairs into a market.
pub fn parse_market(pairs: &[String]) -> Result<Market, Box<dyn std::error::Error>> {
    let mut market = Market::new();
    for pair in pairs {
        let (symbol, value) = split_pair(pair)?;
        let price: f64 = value
            .parse()
            .map_err(|_| format!("Invalid price '{value}' for '{symbol}'"))?;
        if price <= 0.0 {
            return Err(format!("Price for '{symbol}' must be positive, got {price}").into());
        }
        market.insert(Instrument::new(symbol, price));
    }
    if market.is_empty() {
        return Err("Market must contain at least one SYM=PRICE pair".into());
    }
    Ok(market)
}

/// Parse `SYM=QTY` pairs into a portfolio with the given capital.
pub fn parse_portfolio(
    pairs: &[String],
    capital: f64,
) -> Result<Portfolio, Box<dyn std::error::Error>> {
    let mut holdings: BTreeMap<String, u64> = BTreeMap::new();
    for pair in pairs {
        let (symbol, value) = split_pair(pair)?;
        let quantity: u64 = value
            .parse()
            .map_err(|_| format!("Invalid quantity '{value}' for '{symbol}'"))?;
        holdings.insert(symbol.to_string(), quantity);
    }
    if holdings.is_empty() {
        return Err("Holdings must contain at least one SYM=QTY pair".into());
    }
    Ok(Portfolio::with_capital(holdings, capital))
}

fn split_pair(pair: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    if let Some((symbol, value)) = pair.split_once('=') {
        let (symbol, value) = (symbol.trim(), value.trim());
        if !symbol.is_empty() && !value.is_empty() {
            return Ok((symbol, value));
        }
    }
    Err(format!("Expected SYM=VALUE, got '{pair}'").into())
}
