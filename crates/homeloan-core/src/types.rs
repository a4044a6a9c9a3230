use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Values expressed in percent units (11.25 = 11.25%).
pub type Percent = Decimal;

/// Terms of a fixed-rate, fully amortising home loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount financed.
    pub principal: Money,
    /// Nominal annual rate in percent, compounded monthly.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

impl LoanParameters {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// Periodic (monthly) rate as a decimal fraction.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(12)
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing so that identical
/// inputs always serialise to identical outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
