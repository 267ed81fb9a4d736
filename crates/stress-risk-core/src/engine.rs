use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::audit::{AuditSink, NoopAudit};
use crate::error::StressRiskError;
use crate::market::Market;
use crate::portfolio::Portfolio;
use crate::types::{with_metadata, ComputationOutput};
use crate::valuation::portfolio_value;
use crate::StressRiskResult;

/// Path counts below this earn a warning: the estimate is still legal but
/// statistically thin.
const LOW_PATH_WARNING_THRESHOLD: u32 = 100;

fn default_simulations() -> u32 {
    200
}

fn default_steps_per_path() -> u32 {
    10
}

/// Top-level input for a stress-risk estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressRiskInput {
    pub portfolio: Portfolio,
    pub market: Market,
    /// Number of independent simulation paths.
    #[serde(default = "default_simulations")]
    pub simulations: u32,
    /// Per-step shock volatility, strictly positive.
    pub volatility: f64,
    /// Stress steps applied within each path.
    #[serde(default = "default_steps_per_path")]
    pub steps_per_path: u32,
    /// Optional seed for reproducibility.
    pub seed: Option<u64>,
}

/// Output of a stress-risk estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEstimate {
    /// Worst observed drawdown across all paths, as a percentage of the
    /// initial portfolio value. Never negative.
    pub risk_pct: f64,
    /// Baseline portfolio value, computed once on the unstressed market.
    pub initial_value: f64,
    /// Worst observed drawdown in currency terms.
    pub max_drawdown: f64,
    pub simulations: u32,
    pub steps_per_path: u32,
}

/// Estimate worst-case portfolio loss via Monte Carlo stress paths.
///
/// Runs `simulations` independent paths. Each path stresses its own clone of
/// the market for `steps_per_path` steps and tracks its maximum drawdown
/// against the fixed baseline; the result is the worst drawdown across all
/// paths as a percentage of the baseline. Worst-single-path aggregation is
/// deliberate: the answer models "how bad could it plausibly get", not the
/// expected loss.
///
/// The input market is only read; its prices are identical before and after
/// the call. Validation failures abort before any stress is applied and no
/// partial result is ever produced.
pub fn estimate_risk(
    input: &StressRiskInput,
) -> StressRiskResult<ComputationOutput<RiskEstimate>> {
    estimate_risk_with_audit(input, &NoopAudit)
}

/// [`estimate_risk`] with an explicit audit sink for informational events.
pub fn estimate_risk_with_audit(
    input: &StressRiskInput,
    audit: &dyn AuditSink,
) -> StressRiskResult<ComputationOutput<RiskEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Validation, before any simulation work
    if input.simulations == 0 {
        return Err(StressRiskError::InvalidParameter {
            field: "simulations".into(),
            reason: "Must be at least 1".into(),
        });
    }
    if !input.volatility.is_finite() || input.volatility <= 0.0 {
        return Err(StressRiskError::InvalidParameter {
            field: "volatility".into(),
            reason: "Must be a finite value greater than 0".into(),
        });
    }
    if input.steps_per_path == 0 {
        return Err(StressRiskError::InvalidParameter {
            field: "steps_per_path".into(),
            reason: "Must be at least 1".into(),
        });
    }

    if input.simulations < LOW_PATH_WARNING_THRESHOLD {
        warnings.push(format!(
            "Only {} simulation paths; estimates below {} paths are statistically thin",
            input.simulations, LOW_PATH_WARNING_THRESHOLD
        ));
    }

    // Baseline is computed once, on the unstressed market, and held constant
    // across every path and step. A missing portfolio symbol surfaces here,
    // before the first path runs.
    let initial_value = portfolio_value(&input.portfolio, &input.market)?;
    if initial_value <= 0.0 {
        return Err(StressRiskError::DegenerateBaseline {
            value: initial_value,
        });
    }

    audit.record("simulation started");

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut max_loss = 0.0_f64;

    for _ in 0..input.simulations {
        // Isolated copy per path: stressing it cannot touch the input
        // market or any sibling path.
        let mut path_market = input.market.clone();
        let mut worst = 0.0_f64;

        for _ in 0..input.steps_per_path {
            path_market.apply_stress(input.volatility, &mut rng)?;
            let current = portfolio_value(&input.portfolio, &path_market)?;
            // Drawdown can be negative when the market rallied; the running
            // maximum never drops below zero.
            worst = worst.max(initial_value - current);
        }

        max_loss = max_loss.max(worst);
    }

    let estimate = RiskEstimate {
        risk_pct: (max_loss / initial_value) * 100.0,
        initial_value,
        max_drawdown: max_loss,
        simulations: input.simulations,
        steps_per_path: input.steps_per_path,
    };

    audit.record(&format!(
        "simulation completed: risk {:.4}% over {} paths",
        estimate.risk_pct, estimate.simulations
    ));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Stress Risk",
        &serde_json::json!({
            "simulations": input.simulations,
            "volatility": input.volatility,
            "steps_per_path": input.steps_per_path,
            "seed": input.seed,
            "instruments": input.market.len(),
            "positions": input.portfolio.len(),
        }),
        warnings,
        elapsed,
        estimate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAudit;
    use crate::market::Instrument;
    use pretty_assertions::assert_eq;

    const SEED: u64 = 42;

    fn sample_market() -> Market {
        Market::from_iter([
            Instrument::new("AAPL", 185.0),
            Instrument::new("GOOG", 135.0),
            Instrument::new("TSLA", 240.0),
        ])
    }

    fn sample_portfolio() -> Portfolio {
        Portfolio::from_iter([
            ("AAPL".to_string(), 50),
            ("GOOG".to_string(), 10),
            ("TSLA".to_string(), 20),
        ])
    }

    fn basic_input() -> StressRiskInput {
        StressRiskInput {
            portfolio: sample_portfolio(),
            market: sample_market(),
            simulations: 200,
            volatility: 0.05,
            steps_per_path: 10,
            seed: Some(SEED),
        }
    }

    fn assert_market_unchanged(market: &Market) {
        assert_eq!(market.price("AAPL"), Some(185.0));
        assert_eq!(market.price("GOOG"), Some(135.0));
        assert_eq!(market.price("TSLA"), Some(240.0));
    }

    // --- Happy path ---

    #[test]
    fn test_basic_estimate_runs() {
        let result = estimate_risk(&basic_input()).unwrap();
        let est = &result.result;
        assert_eq!(est.initial_value, 15_400.0);
        assert_eq!(est.simulations, 200);
        assert_eq!(est.steps_per_path, 10);
        assert!(est.risk_pct > 0.0, "risk_pct={}", est.risk_pct);
    }

    #[test]
    fn test_seeded_reproducibility() {
        let input = basic_input();
        let r1 = estimate_risk(&input).unwrap();
        let r2 = estimate_risk(&input).unwrap();
        assert_eq!(r1.result.risk_pct, r2.result.risk_pct);
        assert_eq!(r1.result.max_drawdown, r2.result.max_drawdown);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut input = basic_input();
        let r1 = estimate_risk(&input).unwrap();
        input.seed = Some(SEED + 1);
        let r2 = estimate_risk(&input).unwrap();
        // Identical worst-case drawdowns from disjoint draw sequences would
        // be a one-in-astronomical coincidence.
        assert!(r1.result.risk_pct != r2.result.risk_pct);
    }

    #[test]
    fn test_risk_is_never_negative() {
        for seed in 0..20 {
            let mut input = basic_input();
            input.seed = Some(seed);
            input.simulations = 20;
            let result = estimate_risk(&input).unwrap();
            assert!(
                result.result.risk_pct >= 0.0,
                "seed {seed} gave {}",
                result.result.risk_pct
            );
        }
    }

    #[test]
    fn test_input_market_unchanged_after_run() {
        let input = basic_input();
        estimate_risk(&input).unwrap();
        assert_market_unchanged(&input.market);
    }

    #[test]
    fn test_drawdown_consistent_with_percentage() {
        let result = estimate_risk(&basic_input()).unwrap();
        let est = &result.result;
        let implied = est.max_drawdown / est.initial_value * 100.0;
        assert!((est.risk_pct - implied).abs() < 1e-9);
    }

    #[test]
    fn test_higher_volatility_raises_mean_risk() {
        // Statistical, not single-run: compare means over many seeds.
        let mean_risk = |volatility: f64| -> f64 {
            let mut total = 0.0;
            for seed in 0..25 {
                let mut input = basic_input();
                input.simulations = 40;
                input.volatility = volatility;
                input.seed = Some(seed);
                total += estimate_risk(&input).unwrap().result.risk_pct;
            }
            total / 25.0
        };

        let low = mean_risk(0.01);
        let high = mean_risk(0.10);
        assert!(high > low, "mean risk at vol 0.10 ({high}) <= vol 0.01 ({low})");
    }

    // --- Validation ---

    #[test]
    fn test_zero_simulations_rejected() {
        let mut input = basic_input();
        input.simulations = 0;
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(
            err,
            StressRiskError::InvalidParameter { ref field, .. } if field == "simulations"
        ));
        assert_market_unchanged(&input.market);
    }

    #[test]
    fn test_zero_volatility_rejected() {
        let mut input = basic_input();
        input.volatility = 0.0;
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(
            err,
            StressRiskError::InvalidParameter { ref field, .. } if field == "volatility"
        ));
        assert_market_unchanged(&input.market);
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let mut input = basic_input();
        input.volatility = -0.05;
        assert!(estimate_risk(&input).is_err());
    }

    #[test]
    fn test_nan_volatility_rejected() {
        let mut input = basic_input();
        input.volatility = f64::NAN;
        assert!(estimate_risk(&input).is_err());
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut input = basic_input();
        input.steps_per_path = 0;
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(
            err,
            StressRiskError::InvalidParameter { ref field, .. } if field == "steps_per_path"
        ));
    }

    #[test]
    fn test_single_path_run_is_legal_but_warned() {
        let mut input = basic_input();
        input.simulations = 1;
        let result = estimate_risk(&input).unwrap();
        assert_eq!(result.result.simulations, 1);
        assert!(result.result.risk_pct >= 0.0);
        assert!(
            result.warnings.iter().any(|w| w.contains("statistically thin")),
            "expected a low-path-count warning"
        );
    }

    #[test]
    fn test_full_path_count_has_no_warnings() {
        let result = estimate_risk(&basic_input()).unwrap();
        assert!(result.warnings.is_empty());
    }

    // --- Error propagation ---

    #[test]
    fn test_undefined_instrument_fails_before_any_path() {
        let mut input = basic_input();
        input.portfolio = Portfolio::from_iter([
            ("AAPL".to_string(), 50),
            ("MSFT".to_string(), 5),
        ]);
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(
            err,
            StressRiskError::UndefinedInstrument { ref symbol } if symbol == "MSFT"
        ));
        assert_market_unchanged(&input.market);
    }

    #[test]
    fn test_empty_portfolio_is_degenerate_baseline() {
        let mut input = basic_input();
        input.portfolio = Portfolio::new(Default::default());
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(err, StressRiskError::DegenerateBaseline { value } if value == 0.0));
    }

    #[test]
    fn test_zero_quantity_holdings_are_degenerate_baseline() {
        let mut input = basic_input();
        input.portfolio = Portfolio::from_iter([("AAPL".to_string(), 0)]);
        let err = estimate_risk(&input).unwrap_err();
        assert!(matches!(err, StressRiskError::DegenerateBaseline { .. }));
    }

    // --- Audit collaborator ---

    #[test]
    fn test_audit_events_are_emitted() {
        let sink = MemoryAudit::new();
        estimate_risk_with_audit(&basic_input(), &sink).unwrap();
        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "simulation started");
        assert!(entries[1].starts_with("simulation completed"));
    }

    #[test]
    fn test_no_audit_events_on_validation_failure() {
        let sink = MemoryAudit::new();
        let mut input = basic_input();
        input.volatility = 0.0;
        estimate_risk_with_audit(&input, &sink).unwrap_err();
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_noop_sink_matches_default_path() {
        let input = basic_input();
        let with_noop = estimate_risk_with_audit(&input, &NoopAudit).unwrap();
        let plain = estimate_risk(&input).unwrap();
        assert_eq!(with_noop.result.risk_pct, plain.result.risk_pct);
    }

    // --- Envelope & serde ---

    #[test]
    fn test_envelope_metadata() {
        let result = estimate_risk(&basic_input()).unwrap();
        assert_eq!(result.methodology, "Monte Carlo Stress Risk");
        assert_eq!(result.metadata.precision, "ieee754_f64");
        assert_eq!(result.assumptions["simulations"], 200);
        assert_eq!(result.assumptions["instruments"], 3);
    }

    #[test]
    fn test_input_round_trips_through_json() {
        let input = basic_input();
        let json = serde_json::to_string(&input).unwrap();
        let parsed: StressRiskInput = serde_json::from_str(&json).unwrap();
        let r1 = estimate_risk(&input).unwrap();
        let r2 = estimate_risk(&parsed).unwrap();
        assert_eq!(r1.result.risk_pct, r2.result.risk_pct);
    }

    #[test]
    fn test_input_serde_defaults() {
        let parsed: StressRiskInput = serde_json::from_str(
            r#"{
                "portfolio": {"holdings": {"AAPL": 50}},
                "market": {"instruments": {"AAPL": {"symbol": "AAPL", "price": 185.0}}},
                "volatility": 0.05
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.simulations, 200);
        assert_eq!(parsed.steps_per_path, 10);
        assert_eq!(parsed.seed, None);
    }
}
