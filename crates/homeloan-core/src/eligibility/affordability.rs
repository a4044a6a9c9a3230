use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::annuity::loan_for_payment;
use crate::error::HomeLoanError;
use crate::types::{Money, Percent, Rate};
use crate::HomeLoanResult;

/// Share of gross income lenders allow for the bond instalment by default.
const DEFAULT_REPAYMENT_RATIO: Decimal = dec!(0.30);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub gross_monthly_income: Money,
    #[serde(default)]
    pub other_monthly_income: Money,
    pub monthly_expenses: Money,
    #[serde(default)]
    pub existing_monthly_debt_service: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub deposit_amount: Money,
    /// Maximum instalment as a share of income (default 30%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_repayment_ratio: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutcome {
    pub total_monthly_income: Money,
    /// Income left after expenses and existing debt.
    pub disposable_income: Money,
    pub repayment_ratio: Rate,
    pub max_monthly_repayment: Money,
    pub max_loan_amount: Money,
    pub max_purchase_price: Money,
}

/// Largest instalment, bond and purchase price an income supports.
///
/// The instalment is capped both by the repayment ratio and by what is left
/// after expenses and existing debt.
pub fn assess_affordability(input: &AffordabilityInput) -> HomeLoanResult<AffordabilityOutcome> {
    validate_input(input)?;

    let ratio = input.max_repayment_ratio.unwrap_or(DEFAULT_REPAYMENT_RATIO);
    let income = input.gross_monthly_income + input.other_monthly_income;
    let disposable = income - input.monthly_expenses - input.existing_monthly_debt_service;

    let max_repayment = (income * ratio).min(disposable).max(Decimal::ZERO);
    let max_loan = loan_for_payment(max_repayment, input.annual_rate_percent, input.term_years)?;

    Ok(AffordabilityOutcome {
        total_monthly_income: income,
        disposable_income: disposable,
        repayment_ratio: ratio,
        max_monthly_repayment: max_repayment,
        max_loan_amount: max_loan,
        max_purchase_price: max_loan + input.deposit_amount,
    })
}

fn validate_input(input: &AffordabilityInput) -> HomeLoanResult<()> {
    let money_fields = [
        ("gross_monthly_income", input.gross_monthly_income),
        ("other_monthly_income", input.other_monthly_income),
        ("monthly_expenses", input.monthly_expenses),
        ("existing_monthly_debt_service", input.existing_monthly_debt_service),
        ("deposit_amount", input.deposit_amount),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            return Err(HomeLoanError::invalid(field, "Amount cannot be negative"));
        }
    }
    if let Some(ratio) = input.max_repayment_ratio {
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return Err(HomeLoanError::invalid(
                "max_repayment_ratio",
                "Repayment ratio must be in (0, 1]",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annuity::monthly_payment;
    use crate::types::LoanParameters;
    use rust_decimal_macros::dec;

    fn input() -> AffordabilityInput {
        AffordabilityInput {
            gross_monthly_income: dec!(40_000),
            other_monthly_income: Decimal::ZERO,
            monthly_expenses: dec!(10_000),
            existing_monthly_debt_service: dec!(2_000),
            annual_rate_percent: dec!(11.75),
            term_years: 20,
            deposit_amount: dec!(100_000),
            max_repayment_ratio: None,
        }
    }

    #[test]
    fn test_ratio_caps_repayment() {
        let out = assess_affordability(&input()).unwrap();
        assert_eq!(out.max_monthly_repayment, dec!(12_000));
        assert_eq!(out.disposable_income, dec!(28_000));
        assert_eq!(out.max_purchase_price, out.max_loan_amount + dec!(100_000));

        // The affordable loan should cost exactly the affordable instalment
        let payment =
            monthly_payment(&LoanParameters::new(out.max_loan_amount, dec!(11.75), 20)).unwrap();
        assert!((payment - dec!(12_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_disposable_income_caps_repayment() {
        let mut inp = input();
        inp.monthly_expenses = dec!(33_000);
        let out = assess_affordability(&inp).unwrap();
        assert_eq!(out.max_monthly_repayment, dec!(5_000));
    }

    #[test]
    fn test_overcommitted_income_affords_nothing() {
        let mut inp = input();
        inp.monthly_expenses = dec!(45_000);
        let out = assess_affordability(&inp).unwrap();
        assert_eq!(out.max_monthly_repayment, Decimal::ZERO);
        assert_eq!(out.max_loan_amount, Decimal::ZERO);
        assert_eq!(out.max_purchase_price, dec!(100_000));
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut inp = input();
        inp.max_repayment_ratio = Some(dec!(1.5));
        assert!(assess_affordability(&inp).is_err());
    }
}
