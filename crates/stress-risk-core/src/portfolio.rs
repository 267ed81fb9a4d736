use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference capital figure used when none is supplied.
pub const DEFAULT_CAPITAL: f64 = 100_000.0;

fn default_capital() -> f64 {
    DEFAULT_CAPITAL
}

/// A static book of holdings: symbol to held quantity, plus a reference
/// capital figure. Built once by the host and never mutated afterwards;
/// there are no setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: BTreeMap<String, u64>,
    #[serde(default = "default_capital")]
    capital: f64,
}

impl Portfolio {
    pub fn new(holdings: BTreeMap<String, u64>) -> Self {
        Self {
            holdings,
            capital: DEFAULT_CAPITAL,
        }
    }

    pub fn with_capital(holdings: BTreeMap<String, u64>, capital: f64) -> Self {
        Self { holdings, capital }
    }

    pub fn holdings(&self) -> impl Iterator<Item = (&str, u64)> {
        self.holdings.iter().map(|(s, q)| (s.as_str(), *q))
    }

    /// Held quantity for a symbol; zero if the symbol is not in the book.
    pub fn quantity(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

impl FromIterator<(String, u64)> for Portfolio {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_portfolio() -> Portfolio {
        Portfolio::from_iter([
            ("AAPL".to_string(), 50),
            ("GOOG".to_string(), 10),
            ("TSLA".to_string(), 20),
        ])
    }

    #[test]
    fn test_quantity_lookup() {
        let portfolio = sample_portfolio();
        assert_eq!(portfolio.quantity("AAPL"), 50);
        assert_eq!(portfolio.quantity("MSFT"), 0);
        assert_eq!(portfolio.len(), 3);
    }

    #[test]
    fn test_default_capital() {
        let portfolio = sample_portfolio();
        assert_eq!(portfolio.capital(), DEFAULT_CAPITAL);
    }

    #[test]
    fn test_capital_serde_default() {
        let parsed: Portfolio =
            serde_json::from_str(r#"{"holdings":{"AAPL":50}}"#).unwrap();
        assert_eq!(parsed.capital(), DEFAULT_CAPITAL);

        let explicit: Portfolio =
            serde_json::from_str(r#"{"holdings":{"AAPL":50},"capital":250000.0}"#).unwrap();
        assert_eq!(explicit.capital(), 250_000.0);
    }

    #[test]
    fn test_holdings_iteration_is_sorted() {
        let portfolio = sample_portfolio();
        let symbols: Vec<&str> = portfolio.holdings().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOG", "TSLA"]);
    }
}
