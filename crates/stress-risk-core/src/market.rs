use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::collections::BTreeMap;

use crate::error::StressRiskError;
use crate::StressRiskResult;

/// Floor applied to every price after a stress step. No instrument may
/// trade at zero or below.
pub const MIN_PRICE: f64 = 0.01;

/// Instrument category label. Carries no behavioral difference in the
/// stress model; it exists so holdings can be classified by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstrumentCategory {
    #[default]
    Equity,
    TechEquity,
}

/// A priced instrument in the market universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    /// Current price, strictly positive.
    pub price: f64,
    #[serde(default)]
    pub category: InstrumentCategory,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            category: InstrumentCategory::default(),
        }
    }

    pub fn with_category(symbol: impl Into<String>, price: f64, category: InstrumentCategory) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            category,
        }
    }
}

/// The instrument universe: a symbol-keyed price map.
///
/// Keys are kept in a `BTreeMap` so iteration order is fixed; with a seeded
/// RNG the assignment of normal draws to instruments is then reproducible.
///
/// `Market` is `Clone` with fully independent storage: stressing a clone
/// never moves prices in the source or in sibling clones. Each simulation
/// path works on its own clone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Market {
    instruments: BTreeMap<String, Instrument>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instrument, replacing any previous entry for its symbol.
    pub fn insert(&mut self, instrument: Instrument) {
        self.instruments.insert(instrument.symbol.clone(), instrument);
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.get(symbol)
    }

    /// Current price for a symbol, if the instrument exists.
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.instruments.get(symbol).map(|i| i.price)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    /// Apply one stochastic stress step to every instrument in place.
    ///
    /// Each price receives an independent multiplicative shock
    /// `price * (1 + z * volatility)` with `z ~ N(0, 1)`, rounded to cent
    /// precision and floored at [`MIN_PRICE`].
    ///
    /// The engine rejects `volatility <= 0` before any stress is applied;
    /// this method does not re-validate it.
    pub fn apply_stress(&mut self, volatility: f64, rng: &mut StdRng) -> StressRiskResult<()> {
        let standard_normal =
            Normal::new(0.0, 1.0).map_err(|e| StressRiskError::InvalidParameter {
                field: "distribution".into(),
                reason: format!("Invalid Normal parameters: {e}"),
            })?;

        for instrument in self.instruments.values_mut() {
            let z: f64 = rng.sample(standard_normal);
            let shocked = instrument.price * (1.0 + z * volatility);
            let rounded = (shocked * 100.0).round() / 100.0;
            instrument.price = rounded.max(MIN_PRICE);
        }
        Ok(())
    }
}

impl FromIterator<Instrument> for Market {
    fn from_iter<I: IntoIterator<Item = Instrument>>(iter: I) -> Self {
        let mut market = Market::new();
        for instrument in iter {
            market.insert(instrument);
        }
        market
    }
}
