pub mod annuity;
pub mod error;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "transfer")]
pub mod transfer;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(all(feature = "schedule", feature = "transfer", feature = "eligibility"))]
pub mod result;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all home-loan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
