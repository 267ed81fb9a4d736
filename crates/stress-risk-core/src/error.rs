use thiserror::Error;

#[derive(Debug, Error)]
pub enum StressRiskError {
    #[error("Invalid parameter: {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Undefined instrument: portfolio references '{symbol}' which is not priced in the market")]
    UndefinedInstrument { symbol: String },

    #[error("Degenerate baseline: initial portfolio value {value} must be strictly positive")]
    DegenerateBaseline { value: f64 },
}
