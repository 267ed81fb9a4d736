use crate::error::StressRiskError;
use crate::market::Market;
use crate::portfolio::Portfolio;
use crate::StressRiskResult;

/// Mark-to-market value of a portfolio against the given market state.
///
/// Sum of `price(symbol) * quantity` over every holding. A holding whose
/// symbol is not priced in the market is a fatal lookup failure; no default
/// price is ever substituted. Pure function of its inputs.
pub fn portfolio_value(portfolio: &Portfolio, market: &Market) -> StressRiskResult<f64> {
    let mut total = 0.0_f64;
    for (symbol, quantity) in portfolio.holdings() {
        let price = market
            .price(symbol)
            .ok_or_else(|| StressRiskError::UndefinedInstrument {
                symbol: symbol.to_string(),
            })?;
        total += price * quantity as f64;
    }
    Ok(total)
}
