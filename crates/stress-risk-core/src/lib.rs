pub mod audit;
pub mod engine;
pub mod error;
pub mod market;
pub mod portfolio;
pub mod types;
pub mod valuation;

pub use error::StressRiskError;
pub use types::*;

/// Standard result type for all stress-risk operations
pub type StressRiskResult<T> = Result<T, StressRiskError>;
