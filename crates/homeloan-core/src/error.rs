use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-amortizing loan: month {month} payment {payment} does not exceed accrued interest {interest}")]
    NonAmortizingLoan {
        month: u32,
        interest: Decimal,
        payment: Decimal,
    },

    #[error("Payoff simulation diverged: balance {remaining_balance} still outstanding after {iterations} months")]
    PayoffSimulationDiverged {
        iterations: u32,
        remaining_balance: Decimal,
    },

    #[error("Invalid duty schedule: {0}")]
    InvalidSchedule(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HomeLoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        HomeLoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for HomeLoanError {
    fn from(e: serde_json::Error) -> Self {
        HomeLoanError::SerializationError(e.to_string())
    }
}
