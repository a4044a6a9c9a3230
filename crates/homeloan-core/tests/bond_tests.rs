use homeloan_core::annuity::{annuity, monthly_payment};
use homeloan_core::result::{calculate_bond, BondInput, CalculationOutputs};
use homeloan_core::schedule::amortization::{generate, periods, ScheduleFrequency};
use homeloan_core::schedule::payoff::simulate_extra_payment;
use homeloan_core::{HomeLoanError, LoanParameters};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Annuity and schedule tests
// ===========================================================================

fn reference_loan() -> LoanParameters {
    // 1m purchase, 100k deposit, 25 years at 11.25%
    LoanParameters::new(dec!(900_000), dec!(11.25), 25)
}

#[test]
fn test_reference_bond_repayment() {
    let payment = monthly_payment(&reference_loan()).unwrap();
    assert_eq!(payment.round_dp(2), dec!(8984.16));
}

#[test]
fn test_schedule_reconciles_to_principal() {
    let loan = reference_loan();
    let schedule = generate(&loan, ScheduleFrequency::Monthly).unwrap();

    assert_eq!(schedule.periods.len(), 300);
    assert_eq!(schedule.total_principal, loan.principal);
    assert_eq!(schedule.final_balance(), Decimal::ZERO);

    let summary = annuity(&loan).unwrap();
    assert!((schedule.total_interest - summary.total_interest).abs() < dec!(0.01));
    assert!((schedule.total_paid - summary.total_repayment).abs() < dec!(0.01));
}

#[test]
fn test_yearly_schedule_matches_monthly_totals() {
    let loan = reference_loan();
    let monthly = generate(&loan, ScheduleFrequency::Monthly).unwrap();
    let yearly = generate(&loan, ScheduleFrequency::Yearly).unwrap();

    assert_eq!(yearly.periods.len(), 25);
    assert_eq!(yearly.total_principal, monthly.total_principal);
    assert_eq!(yearly.total_interest, monthly.total_interest);
    assert_eq!(
        yearly.periods[0].cumulative_interest,
        monthly.periods[11].cumulative_interest
    );
}

#[test]
fn test_balance_never_increases() {
    let mut previous = dec!(900_000);
    for period in periods(&reference_loan()).unwrap() {
        assert!(period.ending_balance <= previous);
        assert!(period.ending_balance >= Decimal::ZERO);
        previous = period.ending_balance;
    }
}

#[test]
fn test_zero_rate_loan_is_straight_line() {
    let loan = LoanParameters::new(dec!(120_000), Decimal::ZERO, 10);
    let summary = annuity(&loan).unwrap();
    assert_eq!(summary.monthly_payment, dec!(1_000));
    assert_eq!(summary.total_interest, Decimal::ZERO);
}

#[test]
fn test_zero_term_rejected() {
    let loan = LoanParameters::new(dec!(500_000), dec!(11), 0);
    match monthly_payment(&loan).unwrap_err() {
        HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_oversized_term_is_invalid_input_everywhere() {
    let loan = LoanParameters::new(dec!(100_000), dec!(10), 400_000_000);
    let results = [
        monthly_payment(&loan).map(|_| ()),
        generate(&loan, ScheduleFrequency::Yearly).map(|_| ()),
        simulate_extra_payment(&loan, dec!(100)).map(|_| ()),
    ];
    for result in results {
        match result.unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}

// ===========================================================================
// Extra payment tests
// ===========================================================================

#[test]
fn test_extra_payment_saves_time_and_interest() {
    let outcome = simulate_extra_payment(&reference_loan(), dec!(1_000)).unwrap();
    assert_eq!(outcome.months_to_payoff, 200);
    assert_eq!(outcome.months_saved, 100);
    assert!(outcome.interest_saved > Decimal::ZERO);
    assert!(outcome.total_interest_paid < outcome.standard_total_interest);
    assert_eq!(outcome.schedule.total_principal, dec!(900_000));
}

#[test]
fn test_no_extra_payment_runs_full_term() {
    let outcome = simulate_extra_payment(&reference_loan(), Decimal::ZERO).unwrap();
    assert_eq!(outcome.months_to_payoff, 300);
    assert_eq!(outcome.months_saved, 0);
    assert!(outcome.interest_saved.abs() < dec!(0.01));
}

#[test]
fn test_larger_extra_never_takes_longer() {
    let loan = LoanParameters::new(dec!(350_000), dec!(9.5), 20);
    let mut previous = u32::MAX;
    for extra in [dec!(0), dec!(250), dec!(500), dec!(1_000), dec!(2_500), dec!(10_000)] {
        let months = simulate_extra_payment(&loan, extra).unwrap().months_to_payoff;
        assert!(months <= previous, "extra {extra} took {months} months");
        previous = months;
    }
}

#[test]
fn test_negative_extra_that_stalls_loan_is_rejected() {
    let err = simulate_extra_payment(&reference_loan(), dec!(-8_984)).unwrap_err();
    match err {
        HomeLoanError::NonAmortizingLoan { month, .. } => assert_eq!(month, 1),
        other => panic!("Expected NonAmortizingLoan, got {other:?}"),
    }
}

// ===========================================================================
// Bond calculator facade
// ===========================================================================

#[test]
fn test_bond_calculator_result() {
    let input = BondInput {
        purchase_price: dec!(1_000_000),
        deposit: dec!(100_000),
        annual_rate_percent: dec!(11.25),
        term_years: 25,
        frequency: ScheduleFrequency::Monthly,
    };
    let out = calculate_bond(&input).unwrap();

    let labels: Vec<&str> = out
        .result
        .display_results
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Loan amount",
            "Monthly repayment",
            "Total interest",
            "Total repayment",
            "Number of payments",
        ]
    );
    assert_eq!(out.result.display_results[0].value, "R 900 000.00");

    match &out.result.outputs {
        CalculationOutputs::Bond(bond) => {
            assert_eq!(bond.annuity.number_of_payments, 300);
            assert_eq!(bond.schedule.periods.len(), 300);
        }
        other => panic!("Expected bond output, got {other:?}"),
    }
}

#[test]
fn test_bond_calculator_rejects_negative_price() {
    let input = BondInput {
        purchase_price: dec!(-500_000),
        deposit: Decimal::ZERO,
        annual_rate_percent: dec!(11),
        term_years: 20,
        frequency: ScheduleFrequency::Monthly,
    };
    match calculate_bond(&input).unwrap_err() {
        HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_bond_calculator_warns_without_deposit() {
    let input = BondInput {
        purchase_price: dec!(750_000),
        deposit: Decimal::ZERO,
        annual_rate_percent: dec!(11.75),
        term_years: 20,
        frequency: ScheduleFrequency::Yearly,
    };
    let out = calculate_bond(&input).unwrap();
    assert_eq!(out.warnings.len(), 1);
}
