use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::annuity::monthly_payment;
use crate::eligibility::profile::{CreditTier, EmploymentDuration, ExistingDebts};
use crate::error::HomeLoanError;
use crate::types::{LoanParameters, Money, Percent, Rate};
use crate::HomeLoanResult;

/// Fixed repayment assumptions used to turn outstanding balances into
/// monthly instalments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtServiceAssumptions {
    /// Minimum monthly repayment as a share of the card balance.
    pub credit_card_payment_rate: Rate,
    pub personal_loan_rate_percent: Percent,
    pub personal_loan_term_years: u32,
    pub car_loan_rate_percent: Percent,
    pub car_loan_term_years: u32,
    pub other_debt_payment_rate: Rate,
}

impl Default for DebtServiceAssumptions {
    fn default() -> Self {
        Self {
            credit_card_payment_rate: dec!(0.03),
            personal_loan_rate_percent: dec!(24),
            personal_loan_term_years: 5,
            car_loan_rate_percent: dec!(13),
            car_loan_term_years: 6,
            other_debt_payment_rate: dec!(0.05),
        }
    }
}

impl DebtServiceAssumptions {
    /// Estimated monthly instalments on the outstanding balances.
    pub fn estimate(&self, debts: &ExistingDebts) -> HomeLoanResult<Money> {
        let personal = monthly_payment(&LoanParameters::new(
            debts.personal_loan_balance,
            self.personal_loan_rate_percent,
            self.personal_loan_term_years,
        ))?;
        let car = monthly_payment(&LoanParameters::new(
            debts.car_loan_balance,
            self.car_loan_rate_percent,
            self.car_loan_term_years,
        ))?;

        Ok(debts.credit_card_balance * self.credit_card_payment_rate
            + personal
            + car
            + debts.other_debt_balance * self.other_debt_payment_rate)
    }
}

/// Lending criteria applied by the eligibility evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    pub min_age: u32,
    pub max_age: u32,
    /// Applicant age plus loan term may not exceed this.
    pub max_age_at_maturity: u32,
    pub min_monthly_income: Money,
    pub max_loan_to_value_percent: Percent,
    pub max_debt_to_income_percent: Percent,
    pub min_credit_tier: CreditTier,
    pub min_employment_duration: EmploymentDuration,
    pub min_self_employed_duration: EmploymentDuration,
    pub allow_temporary_residents: bool,
    /// Rate used to project the new bond instalment.
    pub reference_rate_percent: Percent,
    pub advisory_loan_to_value_percent: Percent,
    pub advisory_debt_to_income_percent: Percent,
    /// Eligible applications with DTI above this, up to
    /// `counter_offer_max_debt_to_income_percent`, get a reduced counter-offer.
    pub counter_offer_debt_to_income_percent: Percent,
    pub counter_offer_max_debt_to_income_percent: Percent,
    pub counter_offer_factor: Rate,
    pub debt_service: DebtServiceAssumptions,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 65,
            max_age_at_maturity: 75,
            min_monthly_income: dec!(10_000),
            max_loan_to_value_percent: dec!(100),
            max_debt_to_income_percent: dec!(45),
            min_credit_tier: CreditTier::Fair,
            min_employment_duration: EmploymentDuration::SixToTwelveMonths,
            min_self_employed_duration: EmploymentDuration::OneToTwoYears,
            allow_temporary_residents: false,
            reference_rate_percent: dec!(11.75),
            advisory_loan_to_value_percent: dec!(80),
            advisory_debt_to_income_percent: dec!(35),
            counter_offer_debt_to_income_percent: dec!(40),
            counter_offer_max_debt_to_income_percent: dec!(45),
            counter_offer_factor: dec!(0.9),
            debt_service: DebtServiceAssumptions::default(),
        }
    }
}

impl EligibilityPolicy {
    pub(crate) fn validate(&self) -> HomeLoanResult<()> {
        if self.min_age > self.max_age {
            return Err(HomeLoanError::invalid(
                "min_age",
                "Minimum age cannot exceed maximum age",
            ));
        }
        if self.counter_offer_debt_to_income_percent > self.counter_offer_max_debt_to_income_percent
        {
            return Err(HomeLoanError::invalid(
                "counter_offer_debt_to_income_percent",
                "Counter-offer band lower bound exceeds its upper bound",
            ));
        }
        if self.counter_offer_factor <= Decimal::ZERO || self.counter_offer_factor > Decimal::ONE {
            return Err(HomeLoanError::invalid(
                "counter_offer_factor",
                "Counter-offer factor must be in (0, 1]",
            ));
        }
        if self.min_monthly_income < Decimal::ZERO {
            return Err(HomeLoanError::invalid(
                "min_monthly_income",
                "Minimum income cannot be negative",
            ));
        }
        let revolving_rates = [
            self.debt_service.credit_card_payment_rate,
            self.debt_service.other_debt_payment_rate,
        ];
        if revolving_rates
            .iter()
            .any(|r| *r < Decimal::ZERO || *r > Decimal::ONE)
        {
            return Err(HomeLoanError::invalid(
                "debt_service",
                "Balance repayment rates must be between 0 and 1",
            ));
        }
        Ok(())
    }
}
