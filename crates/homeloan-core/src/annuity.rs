//! Closed-form annuity mathematics for fixed-rate, fully amortising loans.
//!
//! Every calculator in the crate derives its payment and totals from
//! [`monthly_payment`], so identical loan terms always produce identical
//! figures regardless of which calculation asked for them.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HomeLoanError;
use crate::types::{LoanParameters, Money, Percent, Rate};
use crate::HomeLoanResult;

/// Annual rates at or above this are rejected as out of domain.
const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(100);

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 50;

/// Payment figures derived from a single closed-form payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnuitySummary {
    pub monthly_payment: Money,
    pub number_of_payments: u32,
    pub total_repayment: Money,
    pub total_interest: Money,
}

/// Monthly instalment that fully repays `params.principal` over the term.
///
/// `M = P * r * (1+r)^n / ((1+r)^n - 1)` for a positive monthly rate `r`,
/// and `M = P / n` when the rate is zero.
pub fn monthly_payment(params: &LoanParameters) -> HomeLoanResult<Money> {
    validate_loan(params)?;

    let n = params.number_of_payments();
    let r = params.monthly_rate();

    if r.is_zero() {
        return Ok(params.principal / Decimal::from(n));
    }

    let factor = growth_factor(r, n)?;
    Ok(params.principal * r * factor / (factor - Decimal::ONE))
}

/// Payment, total repayment and total interest for a loan.
pub fn annuity(params: &LoanParameters) -> HomeLoanResult<AnnuitySummary> {
    let payment = monthly_payment(params)?;
    let n = params.number_of_payments();
    let total_repayment = payment * Decimal::from(n);

    Ok(AnnuitySummary {
        monthly_payment: payment,
        number_of_payments: n,
        total_repayment,
        total_interest: total_repayment - params.principal,
    })
}

/// Largest principal that `payment` fully repays over the term (present
/// value of the annuity). Inverse of [`monthly_payment`].
pub fn loan_for_payment(
    payment: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> HomeLoanResult<Money> {
    if payment < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "payment",
            "Monthly payment cannot be negative",
        ));
    }
    let params = LoanParameters::new(Decimal::ZERO, annual_rate_percent, term_years);
    validate_loan(&params)?;

    let n = params.number_of_payments();
    let r = params.monthly_rate();

    if r.is_zero() {
        return Ok(payment * Decimal::from(n));
    }

    let factor = growth_factor(r, n)?;
    Ok(payment * (factor - Decimal::ONE) / (r * factor))
}

/// Shared domain checks for every loan-based calculation.
pub(crate) fn validate_loan(params: &LoanParameters) -> HomeLoanResult<()> {
    if params.principal < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "principal",
            "Principal cannot be negative",
        ));
    }
    if params.term_years == 0 {
        return Err(HomeLoanError::invalid(
            "term_years",
            "Loan term must be at least 1 year",
        ));
    }
    if params.term_years > MAX_TERM_YEARS {
        return Err(HomeLoanError::invalid(
            "term_years",
            format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    if params.annual_rate_percent < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if params.annual_rate_percent >= MAX_ANNUAL_RATE_PERCENT {
        return Err(HomeLoanError::invalid(
            "annual_rate_percent",
            "Interest rate must be below 100%",
        ));
    }
    Ok(())
}

fn growth_factor(monthly_rate: Rate, periods: u32) -> HomeLoanResult<Decimal> {
    (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| {
            HomeLoanError::invalid(
                "term_years",
                "Compounding factor exceeds decimal range for this rate and term",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_bond_payment() {
        let params = LoanParameters::new(dec!(900_000), dec!(11.25), 25);
        let payment = monthly_payment(&params).unwrap();
        // 900k @ 11.25% over 300 months ≈ 8,984.16
        assert!((payment - dec!(8984.16)).abs() < dec!(0.01));
        assert_eq!(payment.round(), dec!(8984));
    }

    #[test]
    fn test_zero_rate_is_straight_division() {
        let params = LoanParameters::new(dec!(120_000), Decimal::ZERO, 10);
        let payment = monthly_payment(&params).unwrap();
        assert_eq!(payment, dec!(120_000) / dec!(120));
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_zero_principal_has_zero_payment() {
        let params = LoanParameters::new(Decimal::ZERO, dec!(10), 20);
        assert_eq!(monthly_payment(&params).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_term_above_maximum_rejected() {
        for term in [MAX_TERM_YEARS + 1, 400_000_000, u32::MAX] {
            let params = LoanParameters::new(dec!(100_000), dec!(10), term);
            match monthly_payment(&params).unwrap_err() {
                HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
        let longest = LoanParameters::new(dec!(100_000), dec!(10), MAX_TERM_YEARS);
        assert!(monthly_payment(&longest).is_ok());
        assert!(loan_for_payment(dec!(1_000), dec!(10), u32::MAX).is_err());
    }

    #[test]
    fn test_totals_derive_from_same_payment() {
        let params = LoanParameters::new(dec!(1_000_000), dec!(11.75), 20);
        let summary = annuity(&params).unwrap();
        assert_eq!(summary.number_of_payments, 240);
        assert_eq!(
            summary.total_repayment,
            summary.monthly_payment * dec!(240)
        );
        assert_eq!(
            summary.total_interest,
            summary.total_repayment - dec!(1_000_000)
        );
        assert!((summary.monthly_payment - dec!(10837.07)).abs() < dec!(0.01));
    }

    #[test]
    fn test_loan_for_payment_inverts_monthly_payment() {
        let params = LoanParameters::new(dec!(750_000), dec!(10.5), 20);
        let payment = monthly_payment(&params).unwrap();
        let principal = loan_for_payment(payment, dec!(10.5), 20).unwrap();
        assert!((principal - dec!(750_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_loan_for_payment_zero_rate() {
        let principal = loan_for_payment(dec!(500), Decimal::ZERO, 5).unwrap();
        assert_eq!(principal, dec!(30_000));
    }

    #[test]
    fn test_negative_principal_rejected() {
        let params = LoanParameters::new(dec!(-1), dec!(10), 20);
        match monthly_payment(&params).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let params = LoanParameters::new(dec!(100_000), dec!(10), 0);
        match monthly_payment(&params).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_bounds_rejected() {
        for rate in [dec!(-0.5), dec!(100), dec!(150)] {
            let params = LoanParameters::new(dec!(100_000), rate, 20);
            match monthly_payment(&params).unwrap_err() {
                HomeLoanError::InvalidInput { field, .. } => {
                    assert_eq!(field, "annual_rate_percent")
                }
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_payment_rejected() {
        assert!(loan_for_payment(dec!(-10), dec!(10), 20).is_err());
    }
}
