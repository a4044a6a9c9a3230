use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annuity::MAX_TERM_YEARS;
use crate::error::HomeLoanError;
use crate::types::Money;
use crate::HomeLoanResult;

/// Ages above this are treated as data-entry errors.
const MAX_APPLICANT_AGE: u32 = 120;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// Credit standing, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditTier {
    pub fn label(self) -> &'static str {
        match self {
            CreditTier::Poor => "poor",
            CreditTier::Fair => "fair",
            CreditTier::Good => "good",
            CreditTier::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Permanent,
    Contract,
    SelfEmployed,
    Retired,
    Unemployed,
}

/// Time in current employment, ordered shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentDuration {
    UnderSixMonths,
    SixToTwelveMonths,
    OneToTwoYears,
    OverTwoYears,
}

impl EmploymentDuration {
    pub fn label(self) -> &'static str {
        match self {
            EmploymentDuration::UnderSixMonths => "under 6 months",
            EmploymentDuration::SixToTwelveMonths => "6 to 12 months",
            EmploymentDuration::OneToTwoYears => "1 to 2 years",
            EmploymentDuration::OverTwoYears => "over 2 years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidencyType {
    Citizen,
    PermanentResident,
    TemporaryResident,
    NonResident,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Outstanding balances whose instalments are estimated from fixed
/// amortisation assumptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistingDebts {
    pub credit_card_balance: Money,
    pub personal_loan_balance: Money,
    pub car_loan_balance: Money,
    pub other_debt_balance: Money,
}

/// Normalised applicant data submitted for an eligibility decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityProfile {
    pub age: u32,
    pub gross_monthly_income: Money,
    #[serde(default)]
    pub other_monthly_income: Money,
    pub monthly_expenses: Money,
    /// Instalments already known to the applicant.
    #[serde(default)]
    pub existing_monthly_debt_service: Money,
    #[serde(default)]
    pub existing_debts: ExistingDebts,
    pub property_price: Money,
    pub deposit_amount: Money,
    pub loan_term_years: u32,
    pub credit_tier: CreditTier,
    pub employment_status: EmploymentStatus,
    pub employment_duration: EmploymentDuration,
    pub citizen: bool,
    pub residency_type: ResidencyType,
    #[serde(default)]
    pub missed_payments: bool,
    #[serde(default)]
    pub judgments: bool,
    #[serde(default)]
    pub bankruptcy: bool,
}

impl EligibilityProfile {
    pub fn total_monthly_income(&self) -> Money {
        self.gross_monthly_income + self.other_monthly_income
    }

    /// Bond amount needed after the deposit.
    pub fn requested_loan_amount(&self) -> Money {
        self.property_price - self.deposit_amount
    }

    /// Structural checks only. Unmet lending criteria are not errors.
    pub(crate) fn validate(&self) -> HomeLoanResult<()> {
        let money_fields = [
            ("gross_monthly_income", self.gross_monthly_income),
            ("other_monthly_income", self.other_monthly_income),
            ("monthly_expenses", self.monthly_expenses),
            ("existing_monthly_debt_service", self.existing_monthly_debt_service),
            ("credit_card_balance", self.existing_debts.credit_card_balance),
            ("personal_loan_balance", self.existing_debts.personal_loan_balance),
            ("car_loan_balance", self.existing_debts.car_loan_balance),
            ("other_debt_balance", self.existing_debts.other_debt_balance),
            ("deposit_amount", self.deposit_amount),
        ];
        for (field, value) in money_fields {
            if value < Decimal::ZERO {
                return Err(HomeLoanError::invalid(field, "Amount cannot be negative"));
            }
        }
        if self.property_price <= Decimal::ZERO {
            return Err(HomeLoanError::invalid(
                "property_price",
                "Property price must be positive",
            ));
        }
        if self.deposit_amount > self.property_price {
            return Err(HomeLoanError::invalid(
                "deposit_amount",
                "Deposit cannot exceed the property price",
            ));
        }
        if self.loan_term_years == 0 {
            return Err(HomeLoanError::invalid(
                "loan_term_years",
                "Loan term must be at least 1 year",
            ));
        }
        if self.loan_term_years > MAX_TERM_YEARS {
            return Err(HomeLoanError::invalid(
                "loan_term_years",
                format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
            ));
        }
        if self.age > MAX_APPLICANT_AGE {
            return Err(HomeLoanError::invalid(
                "age",
                format!("Age cannot exceed {MAX_APPLICANT_AGE}"),
            ));
        }
        Ok(())
    }
}
