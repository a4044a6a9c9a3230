//! Accelerated payoff: a constant extra amount on top of every instalment.
//!
//! There is no closed form once the extra payment is added, so the balance
//! is walked month by month. The walk is bounded: a month that fails to
//! reduce the balance is rejected outright, and a hard iteration cap turns
//! any remaining non-convergence into an error instead of a hang.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annuity::annuity;
use crate::error::HomeLoanError;
use crate::schedule::amortization::{AmortizationPeriod, AmortizationSchedule, ScheduleFrequency};
use crate::types::{LoanParameters, Money};
use crate::HomeLoanResult;

/// Balance below which the loan is considered repaid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Iteration cap as a multiple of the contractual number of months.
const ITERATION_CAP_MULTIPLIER: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffOutcome {
    pub extra_monthly_amount: Money,
    pub months_to_payoff: u32,
    pub total_interest_paid: Money,
    /// Accelerated monthly schedule.
    pub schedule: AmortizationSchedule,
    pub standard_months: u32,
    pub standard_total_interest: Money,
    /// Negative only when a negative extra amount lengthens the loan.
    pub months_saved: i64,
    pub interest_saved: Money,
}

/// Simulate paying `extra_monthly_amount` on top of the annuity instalment
/// every month until the balance is cleared.
pub fn simulate_extra_payment(
    params: &LoanParameters,
    extra_monthly_amount: Money,
) -> HomeLoanResult<PayoffOutcome> {
    let standard = annuity(params)?;
    let monthly_rate = params.monthly_rate();
    let scheduled_payment = standard.monthly_payment + extra_monthly_amount;
    let iteration_cap = params
        .number_of_payments()
        .saturating_mul(ITERATION_CAP_MULTIPLIER);

    let mut balance = params.principal;
    let mut month: u32 = 0;
    let mut cumulative_principal = Decimal::ZERO;
    let mut cumulative_interest = Decimal::ZERO;
    let mut periods = Vec::with_capacity(params.number_of_payments() as usize);

    while balance > Decimal::ZERO {
        if month >= iteration_cap {
            warn!(
                iterations = month,
                remaining_balance = %balance,
                "payoff simulation hit its iteration cap"
            );
            return Err(HomeLoanError::PayoffSimulationDiverged {
                iterations: month,
                remaining_balance: balance,
            });
        }
        month += 1;

        let interest = balance * monthly_rate;
        let mut principal = scheduled_payment - interest;
        if principal <= Decimal::ZERO {
            warn!(
                month,
                interest = %interest,
                payment = %scheduled_payment,
                "payment does not cover accrued interest"
            );
            return Err(HomeLoanError::NonAmortizingLoan {
                month,
                interest,
                payment: scheduled_payment,
            });
        }

        cumulative_interest += interest;
        if balance - principal < BALANCE_EPSILON {
            principal = balance;
            balance = Decimal::ZERO;
            cumulative_principal = params.principal;
        } else {
            balance -= principal;
            cumulative_principal += principal;
        }

        periods.push(AmortizationPeriod {
            index: month,
            payment: principal + interest,
            principal_component: principal,
            interest_component: interest,
            ending_balance: balance,
            cumulative_principal,
            cumulative_interest,
        });
    }

    let schedule =
        AmortizationSchedule::from_monthly(ScheduleFrequency::Monthly, scheduled_payment, periods);

    debug!(
        extra = %extra_monthly_amount,
        months = month,
        total_interest = %cumulative_interest,
        "payoff simulation converged"
    );

    Ok(PayoffOutcome {
        extra_monthly_amount,
        months_to_payoff: month,
        total_interest_paid: schedule.total_interest,
        standard_months: standard.number_of_payments,
        standard_total_interest: standard.total_interest,
        months_saved: i64::from(standard.number_of_payments) - i64::from(month),
        interest_saved: standard.total_interest - schedule.total_interest,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reference_loan() -> LoanParameters {
        LoanParameters::new(dec!(900_000), dec!(11.25), 25)
    }

    #[test]
    fn test_extra_payment_shortens_term_and_saves_interest() {
        let outcome = simulate_extra_payment(&reference_loan(), dec!(1000)).unwrap();
        assert!(outcome.months_to_payoff < 300);
        assert_eq!(outcome.months_to_payoff, 200);
        assert!(outcome.total_interest_paid < outcome.standard_total_interest);
        assert!(outcome.interest_saved > dec!(690_000));
        assert_eq!(outcome.months_saved, 100);
        assert_eq!(outcome.schedule.total_principal, dec!(900_000));
        assert_eq!(outcome.schedule.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_extra_matches_contractual_term() {
        let outcome = simulate_extra_payment(&reference_loan(), Decimal::ZERO).unwrap();
        assert_eq!(outcome.months_to_payoff, 300);
        assert!(outcome.interest_saved.abs() < dec!(0.01));
    }

    #[test]
    fn test_extra_never_lengthens_term() {
        let params = LoanParameters::new(dec!(350_000), dec!(9.5), 20);
        let mut previous = 240;
        for extra in [dec!(1), dec!(50), dec!(500), dec!(5_000), dec!(400_000)] {
            let outcome = simulate_extra_payment(&params, extra).unwrap();
            assert!(outcome.months_to_payoff <= previous, "extra {extra}");
            previous = outcome.months_to_payoff;
        }
        // A token extra amount only trims the final instalment
        assert_eq!(
            simulate_extra_payment(&params, dec!(1)).unwrap().months_to_payoff,
            240
        );
        assert_eq!(
            simulate_extra_payment(&params, dec!(500)).unwrap().months_to_payoff,
            170
        );
    }

    #[test]
    fn test_huge_extra_pays_off_in_one_month() {
        let params = LoanParameters::new(dec!(100_000), dec!(10), 5);
        let outcome = simulate_extra_payment(&params, dec!(1_000_000)).unwrap();
        assert_eq!(outcome.months_to_payoff, 1);
        let only = &outcome.schedule.periods[0];
        assert_eq!(only.principal_component, dec!(100_000));
        assert_eq!(only.ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_accelerated_components_sum_to_payment_plus_extra() {
        let outcome = simulate_extra_payment(&reference_loan(), dec!(2500)).unwrap();
        let periods = &outcome.schedule.periods;
        for period in &periods[..periods.len() - 1] {
            assert!((period.payment - outcome.schedule.payment).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_zero_principal_needs_no_months() {
        let params = LoanParameters::new(Decimal::ZERO, dec!(10), 20);
        let outcome = simulate_extra_payment(&params, dec!(100)).unwrap();
        assert_eq!(outcome.months_to_payoff, 0);
        assert!(outcome.schedule.periods.is_empty());
    }

    #[test]
    fn test_negative_extra_that_swallows_payment_is_rejected() {
        let err = simulate_extra_payment(&reference_loan(), dec!(-1_000_000)).unwrap_err();
        match err {
            HomeLoanError::NonAmortizingLoan { month, .. } => assert_eq!(month, 1),
            other => panic!("Expected NonAmortizingLoan, got {other:?}"),
        }
    }

    #[test]
    fn test_slow_negative_extra_hits_iteration_cap() {
        // Zero-rate 1-year loan paying 1 per month: 12,000 months needed,
        // cap is 48.
        let params = LoanParameters::new(dec!(12_000), Decimal::ZERO, 1);
        let err = simulate_extra_payment(&params, dec!(-999)).unwrap_err();
        match err {
            HomeLoanError::PayoffSimulationDiverged { iterations, .. } => {
                assert_eq!(iterations, 48)
            }
            other => panic!("Expected PayoffSimulationDiverged, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_rate_rejected_before_simulating() {
        let params = LoanParameters::new(dec!(100_000), dec!(120), 20);
        match simulate_extra_payment(&params, dec!(100)).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate_percent"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
